// Vkbd Matrix Layer
// Virtual keyswitch matrix, keystate grids and scripted input

mod input;
mod keyswitch;
mod store;

pub use input::{InputFrame, InputSource, ScriptedInput};
pub use keyswitch::{KeyState, KeyswitchEvent};
pub use store::VirtualMatrix;
