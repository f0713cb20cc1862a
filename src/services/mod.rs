pub mod signup_service;
