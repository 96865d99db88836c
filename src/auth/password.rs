use crate::error::AppError;

pub fn hash(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|err| AppError::Internal(format!("failed to hash password: {err}")))
}

pub fn verify(plain: &str, hashed: &str) -> Result<bool, AppError> {
    bcrypt::verify(plain, hashed)
        .map_err(|err| AppError::Internal(format!("failed to verify password: {err}")))
}
