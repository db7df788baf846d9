pub mod environment;
pub mod epic;
pub mod row;
pub mod sections;
pub mod ticket;
