use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum BasketError {
    #[error("the caller is not authenticated")]
    Unauthenticated,
    #[error("basket with buyer id {user_id} does not exist")]
    NotFound { user_id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BasketError {
    /// Label used for the `outcome` tag on request metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound { .. } => "not_found",
            Self::Store(_) => "store_error",
        }
    }
}
