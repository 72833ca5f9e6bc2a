pub mod product_handler;
pub mod recommendation_handler;

pub use product_handler::{
    __path_create_product, __path_create_review, __path_delete_product, __path_get_product,
    __path_list_category_products, __path_list_products, __path_update_product, create_product,
    create_review, delete_product, get_product, list_category_products, list_products,
    update_product,
};
pub use recommendation_handler::{__path_list_recommended_products, list_recommended_products};
