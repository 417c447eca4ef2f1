use schemars::schema_for;
use serde_json::Value;

use crate::spec::Quiz;

/// JSON Schema describing quiz documents.
pub fn quiz_schema() -> Value {
    schema_for!(Quiz).to_value()
}
