use crate::{
    error::{Error, Result},
    registry::Reservation,
    App,
};
use engine::validate;
use hyper::{header::AUTHORIZATION, HeaderMap};
use model::{Credentials, PasswordChange, Session};
use rand::Rng;

pub const TOKEN_LEN: usize = 128;
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Argon2id with 64 MiB of memory, 3 passes and 2 lanes.
fn argon2_config() -> argon2::Config<'static> {
    argon2::Config {
        variant: argon2::Variant::Argon2id,
        mem_cost: 64 * 1024,
        time_cost: 3,
        lanes: 2,
        hash_length: 32,
        ..argon2::Config::default()
    }
}

/// Draws a bearer token candidate. Not guaranteed to be unused.
pub fn random_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN).map(|_| char::from(LETTERS[rng.gen_range(0..LETTERS.len())])).collect()
}

/// Encodes the password into a self-describing Argon2id hash.
pub fn hash_password(password: &[u8]) -> Result<String> {
    let salt: [u8; 16] = rand::thread_rng().gen();
    argon2::hash_encoded(password, &salt, &argon2_config()).map_err(|err| {
        log::error!("cannot hash password: {err}");
        Error::Internal
    })
}

pub fn verify_password(hash: &str, password: &[u8]) -> Result<bool> {
    argon2::verify_encoded(hash, password).map_err(|err| {
        log::error!("cannot verify password hash: {err}");
        Error::Internal
    })
}

/// Runs the memory-hard hashing off the async workers.
async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(password.as_bytes())).await.map_err(|_| Error::Internal)?
}

async fn verify_blocking(hash: String, password: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&hash, password.as_bytes()))
        .await
        .map_err(|_| Error::Internal)?
}

impl App {
    /// Reserves a token that is neither persisted nor claimed by a concurrent request.
    async fn reserve_token(&self) -> Result<Reservation<'_>> {
        loop {
            let candidate = random_token();
            if self.db.token_exists(&candidate).await? {
                continue;
            }
            if let Some(reservation) = self.registry.reserve(&candidate) {
                return Ok(reservation);
            }
        }
    }

    pub async fn register(&self, credentials: Credentials) -> Result<Session> {
        let Credentials { mut username, password } = credentials;
        validate::credentials(&mut username, &password)?;

        if self.db.username_exists(&username).await? {
            return Err(Error::Conflict);
        }
        let claim = self.registry.reserve(&username).ok_or(Error::Conflict)?;

        let hash = hash_blocking(password).await?;
        let token = self.reserve_token().await?;
        let id = self.ids.next_id();
        self.db.create_account(&id, token.as_str(), claim.as_str(), &hash).await?;

        let token = String::from(token.as_str());
        drop(claim);
        log::info!("registered account {id}");
        Ok(Session { id, token })
    }

    /// Trades a username and password for the account's current token.
    pub async fn exchange(&self, credentials: Credentials) -> Result<Session> {
        let Credentials { username, password } = credentials;
        let account = match self.db.get_account(username.trim()).await {
            Ok(account) => account,
            Err(db::error::Error::NotFound) => return Err(Error::Unauthorized),
            Err(err) => return Err(err.into()),
        };

        let db::Account { id, token, password: hash } = account;
        if !verify_blocking(hash, password).await? {
            return Err(Error::Unauthorized);
        }

        Ok(Session { id, token })
    }

    /// Replaces the password and rotates the token so that old sessions stop working.
    pub async fn change_password(&self, id: String, change: PasswordChange) -> Result<Session> {
        let PasswordChange { old_password, new_password } = change;
        validate::password(&new_password)?;

        let hash = self.db.get_password(&id).await?;
        if !verify_blocking(hash, old_password).await? {
            return Err(Error::Unauthorized);
        }

        let hash = hash_blocking(new_password).await?;
        let token = self.reserve_token().await?;
        self.db.set_password(&id, &hash, token.as_str()).await?;

        log::info!("account {id} changed its password");
        Ok(Session { id, token: token.as_str().into() })
    }

    /// Resolves the bearer token in the `Authorization` header to an account ID.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<String> {
        let token = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).ok_or(Error::Unauthorized)?;
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        match self.db.get_account_id(token).await {
            Ok(id) => Ok(id),
            Err(db::error::Error::NotFound) => Err(Error::Unauthorized),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{hash_password, random_token, verify_password, TOKEN_LEN};

    #[test]
    fn tokens_are_long_random_letters() {
        let token = random_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphabetic()));
        assert_ne!(token, random_token());
    }

    #[test]
    fn password_hashes_verify() {
        let hash = hash_password(b"correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, b"correct horse").unwrap());
        assert!(!verify_password(&hash, b"battery staple").unwrap());
        assert_ne!(hash, hash_password(b"correct horse").unwrap());
    }
}
