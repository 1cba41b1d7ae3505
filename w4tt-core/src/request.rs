//! Structural validation of an incoming `{tasks, slots}` body.
//!
//! This is the boundary check a transport layer runs before handing typed
//! records to the engine: the body must be an object carrying two arrays, and
//! every element must decode into its record type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RequestError;
use crate::task::{BusySlot, Task};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub tasks: Vec<Task>,
    /// Busy periods to avoid.
    pub slots: Vec<BusySlot>,
}

impl AssignRequest {
    pub fn from_json(body: &str) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_str(body).map_err(RequestError::InvalidJson)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let Value::Object(mut body) = value else {
            return Err(RequestError::NotAnObject);
        };

        let (Some(tasks), Some(slots)) = (body.remove("tasks"), body.remove("slots")) else {
            return Err(RequestError::MissingLists);
        };
        let (Value::Array(tasks), Value::Array(slots)) = (tasks, slots) else {
            return Err(RequestError::NotArrays);
        };

        let tasks = tasks
            .into_iter()
            .enumerate()
            .map(|(index, v)| {
                serde_json::from_value(v).map_err(|source| RequestError::InvalidTask { index, source })
            })
            .collect::<Result<Vec<Task>, _>>()?;

        let slots = slots
            .into_iter()
            .enumerate()
            .map(|(index, v)| {
                serde_json::from_value(v).map_err(|source| RequestError::InvalidSlot { index, source })
            })
            .collect::<Result<Vec<BusySlot>, _>>()?;

        Ok(Self { tasks, slots })
    }
}
