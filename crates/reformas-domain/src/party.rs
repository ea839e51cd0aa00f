//! Company, client and project metadata printed on a quote.

use serde::{Deserialize, Serialize};

/// Company letterhead data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub website: String,
    /// Person who signs quotes on behalf of the company.
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub google_business: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "P&G Construções e Reformas".into(),
            cnpj: "12.345.678/0001-90".into(),
            phone: "(51) 99999-9999".into(),
            email: "contato@pgreformas.com.br".into(),
            address: "Rua das Obras, 123".into(),
            city: "Porto Alegre".into(),
            state: "RS".into(),
            cep: "90000-000".into(),
            website: "www.pgreformas.com.br".into(),
            responsible: "Pedro Gonçalves".into(),
            instagram: "@pgreformas".into(),
            facebook: String::new(),
            google_business: "P&G Construções".into(),
        }
    }
}

/// Snapshot of the client a quote is addressed to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ClientInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ClientInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}
