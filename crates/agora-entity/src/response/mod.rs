//! Response domain entities.

pub mod model;

pub use model::{CreateResponse, PointsAggregate, Response, ResponseWithAuthor};
