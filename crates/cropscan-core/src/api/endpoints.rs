//! Backend routes consumed by the stores.

pub const SIGN_IN: &str = "/auth/signin";
pub const SIGN_UP: &str = "/auth/signup";

pub const GET_DISEASES: &str = "/get_diseases";
pub const POPULATE_DISEASES: &str = "/populate_diseases";
pub const CLEAR_DISEASES: &str = "/clear_diseases";

pub const GET_USER_PLANTS: &str = "/get_user_plants";

pub fn update_disease(id: i64) -> String {
    format!("/update_disease/{id}")
}

pub fn delete_disease(id: i64) -> String {
    format!("/delete_disease/{id}")
}
