//! Resource entities mirroring the backend JSON.
//!
//! # Design
//! Every entity is a plain record replaced wholesale on each fetch. Field
//! decoding goes through the helpers in [`crate::lenient`], so a payload with
//! extra keys, `null`s or stringly numbers still decodes.

use serde::{Deserialize, Serialize};

use crate::lenient::{bool_lenient, f64_lenient, null_as_default, string_lenient, u64_lenient};

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// A single post as returned inside a `data` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "u64_lenient")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: PostAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostAttributes {
    #[serde(default, deserialize_with = "string_lenient")]
    pub title: String,
    #[serde(rename = "createdAt", default, deserialize_with = "string_lenient")]
    pub created_at: String,
    #[serde(rename = "updatedAt", default, deserialize_with = "string_lenient")]
    pub updated_at: String,
}

/// Response body of the post collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Post>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "u64_lenient")]
    pub page: u64,
    #[serde(rename = "pageCount", default, deserialize_with = "u64_lenient")]
    pub page_count: u64,
    #[serde(rename = "pageSize", default, deserialize_with = "u64_lenient")]
    pub page_size: u64,
    #[serde(default, deserialize_with = "u64_lenient")]
    pub total: u64,
}

/// Response body of the single-post endpoints (get, create, update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinglePostResponse {
    pub data: Post,
}

/// Request body for creating or updating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub data: CreatePostData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostData {
    pub title: String,
}

impl CreatePostRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            data: CreatePostData {
                title: title.into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The signed-in user with its owned relations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersMeResponse {
    #[serde(default, deserialize_with = "u64_lenient")]
    pub id: u64,
    #[serde(rename = "documentId", default, deserialize_with = "string_lenient")]
    pub document_id: String,
    #[serde(default, deserialize_with = "string_lenient")]
    pub username: String,
    #[serde(default, deserialize_with = "string_lenient")]
    pub email: String,
    #[serde(default, deserialize_with = "bool_lenient")]
    pub confirmed: bool,
    #[serde(default, deserialize_with = "bool_lenient")]
    pub blocked: bool,
    #[serde(default, deserialize_with = "bool_lenient")]
    pub professional: bool,
    #[serde(rename = "createdAt", default, deserialize_with = "string_lenient")]
    pub created_at: String,
    #[serde(rename = "updatedAt", default, deserialize_with = "string_lenient")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<Address>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adverts: Vec<Advert>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "u64_lenient")]
    pub id: u64,
    #[serde(rename = "documentId", default, deserialize_with = "string_lenient")]
    pub document_id: String,
    #[serde(rename = "firstName", default, deserialize_with = "string_lenient")]
    pub first_name: String,
    #[serde(rename = "lastName", default, deserialize_with = "string_lenient")]
    pub last_name: String,
    #[serde(rename = "firstLineAddress", default, deserialize_with = "string_lenient")]
    pub first_line_address: String,
    #[serde(rename = "secondLineAddress", default, deserialize_with = "string_lenient")]
    pub second_line_address: String,
    #[serde(rename = "postCode", default, deserialize_with = "string_lenient")]
    pub post_code: String,
    #[serde(default, deserialize_with = "string_lenient")]
    pub city: String,
    #[serde(default, deserialize_with = "string_lenient")]
    pub country: String,
    #[serde(rename = "phoneNumber", default, deserialize_with = "string_lenient")]
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Advert {
    #[serde(default, deserialize_with = "u64_lenient")]
    pub id: u64,
    #[serde(rename = "documentId", default, deserialize_with = "string_lenient")]
    pub document_id: String,
    #[serde(default, deserialize_with = "string_lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "string_lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "f64_lenient", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "createdAt", default, deserialize_with = "string_lenient")]
    pub created_at: String,
    #[serde(rename = "updatedAt", default, deserialize_with = "string_lenient")]
    pub updated_at: String,
}

/// Mutable address fields, sent under a `data` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressData {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "firstLineAddress")]
    pub first_line_address: String,
    #[serde(rename = "secondLineAddress")]
    pub second_line_address: String,
    #[serde(rename = "postCode")]
    pub post_code: String,
    pub city: String,
    pub country: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressUpdateRequest {
    pub data: AddressData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressUpdateResponse {
    pub data: Address,
}
