mod pipeline;
mod stage;

pub use pipeline::{Pipeline, Redirects};
pub use stage::CommandStage;
