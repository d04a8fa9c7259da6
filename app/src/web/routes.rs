// bakehouse/app/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::web::handlers::{
  attendance_handlers, auth_handlers, cart_handlers, category_handlers, checkout_handlers, expense_handlers,
  order_handlers, payment_method_handlers, product_handlers, report_handlers, schedule_handlers, size_handlers,
  user_handlers,
};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Public and signed-in routes live at the top of `/api/v1`; `/staff` and
/// `/admin` are gated by the role table through `AuthenticatedUser`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      .route("/categories", web::get().to(category_handlers::list_categories_handler))
      .route("/sizes", web::get().to(size_handlers::list_sizes_handler))
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{item_id}", web::patch().to(cart_handlers::update_cart_item_handler))
          .route("/items/{item_id}", web::delete().to(cart_handlers::remove_cart_item_handler)),
      )
      .route("/checkout", web::post().to(checkout_handlers::checkout_handler))
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_my_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_my_order_handler)),
      )
      .service(
        web::scope("/payment-methods")
          .route("", web::get().to(payment_method_handlers::list_payment_methods_handler))
          .route("", web::post().to(payment_method_handlers::add_payment_method_handler))
          .route(
            "/{method_id}/default",
            web::post().to(payment_method_handlers::set_default_payment_method_handler),
          )
          .route("/{method_id}", web::delete().to(payment_method_handlers::delete_payment_method_handler)),
      )
      .service(
        web::scope("/staff")
          .route("/attendance", web::get().to(attendance_handlers::my_attendance_handler))
          .route("/attendance/{action}", web::post().to(attendance_handlers::mark_attendance_handler))
          .route("/schedules", web::get().to(schedule_handlers::my_schedules_handler)),
      )
      .service(
        web::scope("/admin")
          .route("/orders", web::get().to(order_handlers::admin_list_orders_handler))
          .route("/orders/{order_id}/status", web::patch().to(order_handlers::update_order_status_handler))
          .route("/products", web::post().to(product_handlers::create_product_handler))
          .route("/products/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route("/products/{product_id}", web::delete().to(product_handlers::delete_product_handler))
          .route("/categories", web::post().to(category_handlers::create_category_handler))
          .route("/categories/{category_id}", web::put().to(category_handlers::update_category_handler))
          .route("/categories/{category_id}", web::delete().to(category_handlers::delete_category_handler))
          .route("/sizes", web::post().to(size_handlers::create_size_handler))
          .route("/sizes/{size_id}", web::put().to(size_handlers::update_size_handler))
          .route("/sizes/{size_id}", web::delete().to(size_handlers::delete_size_handler))
          .route("/users", web::get().to(user_handlers::list_users_handler))
          .route("/users/{user_id}/role", web::patch().to(user_handlers::change_role_handler))
          .route("/users/{user_id}", web::delete().to(user_handlers::remove_user_handler))
          .route("/attendance", web::get().to(attendance_handlers::admin_attendance_handler))
          .route("/schedules", web::get().to(schedule_handlers::admin_list_schedules_handler))
          .route("/schedules", web::post().to(schedule_handlers::create_schedule_handler))
          .route("/schedules/{schedule_id}", web::put().to(schedule_handlers::update_schedule_handler))
          .route("/schedules/{schedule_id}", web::delete().to(schedule_handlers::delete_schedule_handler))
          .route("/expenses", web::get().to(expense_handlers::list_expenses_handler))
          .route("/expenses", web::post().to(expense_handlers::create_expense_handler))
          .route("/expenses/{expense_id}", web::put().to(expense_handlers::update_expense_handler))
          .route("/expenses/{expense_id}", web::delete().to(expense_handlers::delete_expense_handler))
          .route("/reports/financial", web::get().to(report_handlers::financial_report_handler)),
      ),
  );
}
