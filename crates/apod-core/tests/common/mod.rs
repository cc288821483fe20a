pub mod apod_server;
