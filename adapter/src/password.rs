use shared::error::AppResult;
use tokio::sync::OnceCell;

pub(crate) static MISSING_USER_HASH: OnceCell<String> = OnceCell::const_new();

/// Hashes a plaintext password with a per-call random salt.
pub async fn hash_password(password: &str) -> AppResult<String> {
    hash_password_with_cost(password, bcrypt::DEFAULT_COST).await
}

// bcrypt is CPU-bound; it runs on the blocking pool, off the async workers.
pub(crate) async fn hash_password_with_cost(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await?
        .map_err(Into::into)
}

/// Returns `false` for a wrong password and for a malformed hash alike.
pub async fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let (password, hash) = (password.to_owned(), hash.to_owned());
    let matched =
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await?;
    Ok(matched)
}

/// Spends a full-cost verification for a user name that does not exist,
/// so the lookup costs the same whether or not the account is there.
pub async fn verify_missing_user(password: &str) -> AppResult<()> {
    let hash = MISSING_USER_HASH
        .get_or_try_init(|| hash_password("missing-user-placeholder"))
        .await?;
    verify_password(password, hash).await?;
    Ok(())
}
