pub mod audit;
pub mod response;
pub mod simulation;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
