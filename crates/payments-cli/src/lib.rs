//! # payments-cli
//!
//! Headless host for the Bloque checkout core.
//!
//! Replays a script of UI events against a checkout whose submit callback
//! is a simulated gateway, then reports the final session as JSON.
//!
//! ## Script steps
//!
//! | Step | Effect |
//! |------|--------|
//! | `{"select": "card"}` | Method selector click |
//! | `{"input": {"field": "cvv", "value": "123"}}` | Input event |
//! | `{"submit": {}}` | Submit, gateway approves |
//! | `{"submit": {"reject": "Insufficient funds"}}` | Submit, gateway declines |
//! | `{"configure": {"availableMethods": ["pse"]}}` | New checkout config |

pub mod gateway;
pub mod script;
pub mod settings;

pub use gateway::{GatewayReply, SimulatedGateway};
pub use script::{load_script, parse_script, run_script, ScriptStep, SessionSummary};
pub use settings::HostSettings;
