use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::database::models::{NewToken, PersonalAccessToken, User};
use crate::database::{Store, StoreError};

/// Length of the random half of a plain text token
const SECRET_LEN: usize = 40;

/// Freshly issued token. `plain_text` is shown to the client once and never stored.
#[derive(Debug, Clone)]
pub struct NewAccessToken {
    pub access_token: PersonalAccessToken,
    pub plain_text: String,
}

/// Issue a personal access token for `user`; its abilities are the user's
/// permission names at the time of issue.
pub async fn issue(store: &dyn Store, user: &User, device_name: &str) -> Result<NewAccessToken, StoreError> {
    let secret = generate_secret();
    let abilities = store.permission_names(user.id).await?;

    let access_token = store
        .insert_token(NewToken {
            user_id: user.id,
            name: device_name.to_string(),
            token: hash_secret(&secret),
            abilities,
        })
        .await?;

    let plain_text = format!("{}|{}", access_token.id, secret);
    Ok(NewAccessToken { access_token, plain_text })
}

/// Look up the token a client presented. `None` when the token is malformed,
/// unknown, or its secret does not match.
pub async fn find(store: &dyn Store, plain_text: &str) -> Result<Option<PersonalAccessToken>, StoreError> {
    let Some((id, secret)) = split(plain_text) else {
        return Ok(None);
    };

    let Some(token) = store.find_token(id).await? else {
        return Ok(None);
    };

    if !digest_matches(&token.token, secret) {
        return Ok(None);
    }
    Ok(Some(token))
}

/// Constant-time check of a presented secret against the stored digest
fn digest_matches(stored: &str, secret: &str) -> bool {
    stored.as_bytes().ct_eq(hash_secret(secret).as_bytes()).into()
}

/// `"<id>|<secret>"` into its parts
pub fn split(plain_text: &str) -> Option<(i64, &str)> {
    let (id, secret) = plain_text.split_once('|')?;
    let id = id.parse::<i64>().ok()?;
    if secret.is_empty() {
        return None;
    }
    Some((id, secret))
}

pub fn hash_secret(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

fn generate_secret() -> String {
    let mut secret = String::with_capacity(64);
    secret.push_str(&Uuid::new_v4().simple().to_string());
    secret.push_str(&Uuid::new_v4().simple().to_string());
    secret.truncate(SECRET_LEN);
    secret
}
