//! Repository layer: domain operations as lazy request sequences.
//!
//! Every method returns a fresh [`RequestStream`] that yields `Loading` and
//! then one terminal state. No HTTP call happens until the stream is polled,
//! and nothing is cached or shared between calls: retrying means calling the
//! method again. Errors never escape as `Err`; they arrive as
//! `RequestState::Error`.

pub mod auth;
pub mod posts;
pub mod profile;

pub use auth::AuthRepositoryImpl;
pub use posts::PostRepositoryImpl;
pub use profile::ProfileRepositoryImpl;

use crate::state::RequestStream;
use crate::types::{
    AddressUpdateRequest, AddressUpdateResponse, PostsResponse, SinglePostResponse,
    UsersMeResponse,
};

pub trait PostRepository: Send + Sync {
    fn get_posts(&self) -> RequestStream<PostsResponse>;
    fn get_post_by_id(&self, id: u64) -> RequestStream<SinglePostResponse>;
    fn create_post(&self, title: String) -> RequestStream<SinglePostResponse>;
    fn update_post(&self, id: u64, title: String) -> RequestStream<SinglePostResponse>;
    fn delete_post(&self, id: u64) -> RequestStream<()>;
}

pub trait ProfileRepository: Send + Sync {
    fn get_users_me(&self) -> RequestStream<UsersMeResponse>;
    fn update_address(
        &self,
        document_id: String,
        request: AddressUpdateRequest,
    ) -> RequestStream<AddressUpdateResponse>;
    fn delete_address(&self, document_id: String) -> RequestStream<bool>;
}

pub trait AuthRepository: Send + Sync {
    fn current_user_email(&self) -> Option<String>;
    /// The signed-in customer's identity as a request sequence.
    fn read_customer(&self) -> RequestStream<String>;
}
