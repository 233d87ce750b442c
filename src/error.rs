//! Error taxonomy (spec.md §7). Each fatal variant carries the exit code
//! spec.md §6 assigns it; non-fatal variants (`StateError`, `UserError`)
//! are logged and dropped by the dispatcher rather than propagated.

use crate::wire::WireError;

#[derive(Debug, thiserror::Error)]
pub enum RiverWmError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("protocol error decoding object {object_id} opcode {opcode}: {source}")]
    Protocol {
        object_id: u32,
        opcode: u16,
        source: WireError,
    },

    #[error("compositor reported error {code} on object {object_id}: {message}")]
    Server {
        object_id: u32,
        code: u32,
        message: String,
    },

    #[error("required global interface \"{0}\" was not advertised by the compositor")]
    MissingGlobal(String),

    #[error("event referenced unknown object id {0}")]
    State(u32),

    #[error("action referenced a window that no longer exists")]
    User,
}

impl RiverWmError {
    /// Exit code spec.md §6 assigns this failure, or `None` for the two
    /// non-fatal variants that never terminate the process.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RiverWmError::Transport(_) => Some(2),
            RiverWmError::Protocol { .. } => Some(3),
            RiverWmError::Server { .. } => Some(1),
            RiverWmError::MissingGlobal(_) => Some(1),
            RiverWmError::State(_) => None,
            RiverWmError::User => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.exit_code().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_maps_to_exit_code_2() {
        let err = RiverWmError::Transport(std::io::Error::new(std::io::ErrorKind::Other, "x"));
        assert_eq!(err.exit_code(), Some(2));
    }

    #[test]
    fn state_error_is_non_fatal() {
        let err = RiverWmError::State(99);
        assert!(!err.is_fatal());
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn missing_global_maps_to_exit_code_1() {
        let err = RiverWmError::MissingGlobal("zriver_window_management_v1".to_string());
        assert_eq!(err.exit_code(), Some(1));
    }
}
