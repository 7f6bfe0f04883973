//! Core library for the inventory-sync command line application.
//!
//! The library republishes the stock levels kept in a spreadsheet to a remote
//! offer import API. Responsibilities are split the same way the pipeline
//! runs: the spreadsheet reader lives under [`inventory::io`], the offer
//! schema in [`inventory::model`] and [`inventory::mapper`], the HTTP client
//! in [`inventory::api`], a single cycle in [`inventory::sync`], and the
//! periodic loop in [`inventory::schedule`].

pub mod inventory;

pub use inventory::{
    ErrorKind, Result, SyncError, api, config, error, io, logging, mapper, model, schedule,
    shutdown, sync,
};
