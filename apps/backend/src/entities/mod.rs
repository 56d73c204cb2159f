pub mod post_categories;
pub mod posts;
pub mod users;

pub use post_categories::Entity as PostCategories;
pub use posts::Entity as Posts;
pub use users::Entity as Users;
