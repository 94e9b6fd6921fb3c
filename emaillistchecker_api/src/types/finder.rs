//! Request bodies for the email finder endpoints. Responses are untyped.

use serde::Serialize;

/// Body of `POST /finder/email`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FindEmailRequest {
    pub first_name: String,
    pub last_name: String,
    pub domain: String,
}

/// Body of `POST /finder/domain`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DomainSearchRequest {
    pub domain: String,
    pub limit: u32,
    pub offset: u32,
}

/// Body of `POST /finder/company`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CompanySearchRequest {
    pub company: String,
    pub limit: u32,
}
