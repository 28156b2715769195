use thiserror::Error;

/// Structural failure: the payload root can never hold a shopping list.
///
/// Data-quality problems (unknown shapes, unparseable quantities, numeric
/// names, incompatible units) are recovered inside the pipeline and are
/// never reported through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Unsupported root value: expected object, array or string, got {kind}")]
    InvalidRoot { kind: &'static str },
}
