/// Which backend surface serves the label. The contract is identical;
/// only the endpoint differs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LabelAudience {
    Customer,
    Admin,
}

/// A shipping label comes back either as a redirect-style url object or
/// as the raw document bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelResource {
    Url(String),
    Document(Vec<u8>),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LabelUrlObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub message: Option<String>,
}
