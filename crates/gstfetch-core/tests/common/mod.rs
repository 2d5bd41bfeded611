#![allow(dead_code)]

pub mod pkg_server;
