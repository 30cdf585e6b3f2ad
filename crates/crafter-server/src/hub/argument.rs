use crafter_core::{ApiError, Fault};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Typed hub argument carrying the caller's invocation id
///
/// ```json
/// { "invocationId": "4f1c...", "argument": { "text": "hello" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubArgument<T> {
    pub invocation_id: String,
    pub argument: T,
}

/// Raw arguments of a hub invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubArguments(Vec<Value>);

impl HubArguments {
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Deserialize the argument at `index`
    ///
    /// # Errors
    ///
    /// A missing argument raises a bad request; a malformed one raises the
    /// JSON error, which is classified as an import failure.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, Fault> {
        let value = self
            .0
            .get(index)
            .ok_or_else(|| ApiError::bad_request(format!("argument_{index}_is_missing")))?;

        Ok(T::deserialize(value)?)
    }

    /// First non-blank `invocationId` found among object arguments
    pub fn invocation_id(&self) -> Option<&str> {
        self.0
            .iter()
            .filter_map(|value| value.get("invocationId")?.as_str())
            .find(|id| !id.trim().is_empty())
    }
}
