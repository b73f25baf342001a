pub mod post;
pub mod user;

pub use post::{NewPost, Post, PostChanges, PostFilter};
pub use user::{NewUser, PublicUser, User};
