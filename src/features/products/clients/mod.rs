mod recommender_client;

pub use recommender_client::{BasketRecommender, HttpBasketRecommender};

#[cfg(test)]
pub use recommender_client::MockBasketRecommender;
