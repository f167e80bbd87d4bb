//! Shared test utilities.

#[cfg(test)]
pub mod test;
