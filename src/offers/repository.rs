use super::domain::{Offer, OfferId};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `modify` is the only write path for existing offers. Implementations must run `apply`
/// and store the result as one atomic step, so concurrent edits to different parts of the
/// same offer are all kept.
pub trait OfferRepository: Send + Sync {
    fn insert(&self, offer: Offer) -> Result<Offer, RepositoryError>;
    fn modify(
        &self,
        id: &OfferId,
        apply: &mut dyn FnMut(&mut Offer),
    ) -> Result<Offer, RepositoryError>;
    fn fetch(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError>;
    fn list(&self) -> Result<Vec<Offer>, RepositoryError>;
    fn remove(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("offer already exists")]
    Conflict,
    #[error("offer not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
