pub mod generate;
pub mod report;
pub mod stories;
pub mod submit;

#[cfg(test)]
pub mod fakes;
