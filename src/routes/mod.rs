pub mod soiling_routes;
