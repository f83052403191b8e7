//! Test doubles and common utilities for read handler contract tests
//!
//! This module provides minimal test doubles that record how the read
//! handler talks to its collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dnsrecords_core::error::{Error, Result};
use dnsrecords_core::traits::{DnsRecord, DnsRecordsClient, RecordFilter, StateSnapshot, StateStore};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A client returning a fixed response and recording every filter it sees
#[derive(Clone)]
pub struct RecordingClient {
    records: Vec<DnsRecord>,
    call_count: Arc<AtomicUsize>,
    filters: Arc<Mutex<Vec<RecordFilter>>>,
}

impl RecordingClient {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            call_count: Arc::new(AtomicUsize::new(0)),
            filters: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times list_dns_records() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the filters passed to list_dns_records(), in call order
    pub fn filters(&self) -> Vec<RecordFilter> {
        self.filters.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsRecordsClient for RecordingClient {
    async fn list_dns_records(&self, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.filters.lock().unwrap().push(filter.clone());
        Ok(self.records.clone())
    }

    fn client_name(&self) -> &'static str {
        "recording"
    }
}

/// A client whose every call fails with the given error message
pub struct FailingClient {
    message: String,
    call_count: AtomicUsize,
}

impl FailingClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsRecordsClient for FailingClient {
    async fn list_dns_records(&self, _filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Err(Error::provider("failing", self.message.clone()))
    }

    fn client_name(&self) -> &'static str {
        "failing"
    }
}

/// A state store that rejects every attribute write
#[derive(Default)]
pub struct RejectingStateStore {
    id: Mutex<Option<String>>,
}

#[async_trait]
impl StateStore for RejectingStateStore {
    async fn set(&self, key: &str, _value: Value) -> Result<()> {
        Err(Error::state_store(format!("{}: type mismatch", key)))
    }

    async fn get(&self, _key: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    async fn set_id(&self, id: &str) -> Result<()> {
        *self.id.lock().unwrap() = Some(id.to_string());
        Ok(())
    }

    async fn id(&self) -> Result<Option<String>> {
        Ok(self.id.lock().unwrap().clone())
    }

    async fn snapshot(&self) -> Result<StateSnapshot> {
        Ok(StateSnapshot {
            id: self.id.lock().unwrap().clone(),
            ..StateSnapshot::default()
        })
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Build an upstream record in zone `abc123`
pub fn record(id: &str, name: &str, record_type: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        zone_id: "abc123".to_string(),
        zone_name: "example.com".to_string(),
        ttl: 300,
        created_on: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
        modified_on: Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap(),
    }
}
