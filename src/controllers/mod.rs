pub mod soiling_controller;
