//! A small feed-forward classifier for the MNIST handwritten digit dataset,
//! fed by a parser for the IDX binary record format the dataset ships in.

pub mod model;
pub mod parsing;
