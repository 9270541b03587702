use shared_types::LocationDetails;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailsStatus {
    Loaded(Box<LocationDetails>),
    NotFound,
    Failed(String),
}

impl DetailsStatus {
    /// Upstream answers an unknown id with either no payload or a zeroed record.
    pub fn from_response(response: Result<Option<LocationDetails>, String>) -> Self {
        match response {
            Ok(Some(details)) if details.id != 0 => DetailsStatus::Loaded(Box::new(details)),
            Ok(_) => DetailsStatus::NotFound,
            Err(message) => DetailsStatus::Failed(message),
        }
    }
}
