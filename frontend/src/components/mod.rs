pub mod expense_form;
pub mod expense_list;
pub mod icons;
pub mod loading;
pub mod summary;
