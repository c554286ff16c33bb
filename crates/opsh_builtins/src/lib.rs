mod cd;
mod help;
mod quit;
mod status;
mod utils;

pub use cd::Cd;
pub use help::Help;
pub use quit::Quit;

/// Returns all built-in commands in lookup order.
pub fn all_builtins() -> Vec<Box<dyn opsh_core::command::Command>> {
    vec![Box::new(Cd), Box::new(Help), Box::new(Quit)]
}
