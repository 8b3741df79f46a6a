use std::sync::{Arc, Mutex};

use crate::types::{ArmCommand, GripperCommand};

#[derive(Clone, Debug, PartialEq)]
pub enum ChannelCall {
    Arm(ArmCommand),
    Gripper(GripperCommand),
}

/// One call observed by a dummy channel and the state it answered with.
#[derive(Clone, Debug, PartialEq)]
pub struct CallRecord {
    pub call: ChannelCall,
    pub time: f64,
    pub is_done: bool,
}

/// Shared, ordered record of the calls made on dummy channels.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<CallRecord>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: CallRecord) {
        self.0.lock().unwrap().push(record);
    }

    pub fn records(&self) -> Vec<CallRecord> {
        self.0.lock().unwrap().clone()
    }

    /// Recorded calls that are not reads.
    pub fn commands(&self) -> Vec<CallRecord> {
        self.records()
            .into_iter()
            .filter(|r| {
                !matches!(
                    r.call,
                    ChannelCall::Arm(ArmCommand::Read) | ChannelCall::Gripper(GripperCommand::Read)
                )
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}
