//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal in-memory collaborators that record every
//! call, so tests can assert on exactly what reached the network boundary.

#![allow(dead_code)]

use dnsport_core::error::{Error, Result};
use dnsport_core::traits::{DnsProvider, ExistingRecord, RawAnswer, RecordResolver};
use dnsport_core::{RecordType, VendorRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An in-memory provider that behaves like the vendor for one zone
pub struct MockDnsProvider {
    /// Records the "vendor" holds, in insertion order
    records: Arc<Mutex<Vec<ExistingRecord>>>,
    /// Call counter for retrieve()
    retrieve_call_count: Arc<AtomicUsize>,
    /// Call counter for retrieve_by_name_type()
    lookup_call_count: Arc<AtomicUsize>,
    /// Call counter for create()
    create_call_count: Arc<AtomicUsize>,
    /// Call counter for edit()
    edit_call_count: Arc<AtomicUsize>,
    /// Payloads sent to create()
    created: Arc<Mutex<Vec<(String, VendorRecord)>>>,
    /// (record id, payload) pairs sent to edit()
    edited: Arc<Mutex<Vec<(String, VendorRecord)>>>,
    /// When set, lookups fail with a transport error
    fail_lookups: bool,
    /// When set, writes are rejected with this vendor message
    reject_writes: Option<String>,
    next_id: Arc<AtomicUsize>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            retrieve_call_count: Arc::new(AtomicUsize::new(0)),
            lookup_call_count: Arc::new(AtomicUsize::new(0)),
            create_call_count: Arc::new(AtomicUsize::new(0)),
            edit_call_count: Arc::new(AtomicUsize::new(0)),
            created: Arc::new(Mutex::new(Vec::new())),
            edited: Arc::new(Mutex::new(Vec::new())),
            fail_lookups: false,
            reject_writes: None,
            next_id: Arc::new(AtomicUsize::new(1000)),
        }
    }

    /// Seed a record the vendor already holds
    pub fn with_record(self, record: ExistingRecord) -> Self {
        self.records.lock().unwrap().push(record);
        self
    }

    /// Make every lookup fail
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Make every write fail with a vendor rejection
    pub fn rejecting_writes(mut self, message: &str) -> Self {
        self.reject_writes = Some(message.to_string());
        self
    }

    pub fn retrieve_call_count(&self) -> usize {
        self.retrieve_call_count.load(Ordering::SeqCst)
    }

    pub fn lookup_call_count(&self) -> usize {
        self.lookup_call_count.load(Ordering::SeqCst)
    }

    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    pub fn edit_call_count(&self) -> usize {
        self.edit_call_count.load(Ordering::SeqCst)
    }

    /// Total number of calls of any kind
    pub fn total_calls(&self) -> usize {
        self.retrieve_call_count()
            + self.lookup_call_count()
            + self.create_call_count()
            + self.edit_call_count()
    }

    pub fn created(&self) -> Vec<(String, VendorRecord)> {
        self.created.lock().unwrap().clone()
    }

    pub fn edited(&self) -> Vec<(String, VendorRecord)> {
        self.edited.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<ExistingRecord> {
        self.records.lock().unwrap().clone()
    }

    fn fqdn(zone: &str, name: &str) -> String {
        if name.is_empty() || name == "@" {
            zone.to_string()
        } else {
            format!("{}.{}", name, zone)
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn retrieve(&self, domain: &str) -> Result<Vec<ExistingRecord>> {
        self.retrieve_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == domain || r.name.ends_with(&format!(".{}", domain)))
            .cloned()
            .collect())
    }

    async fn retrieve_by_name_type(
        &self,
        domain: &str,
        record_type: RecordType,
        subdomain: &str,
    ) -> Result<Vec<ExistingRecord>> {
        self.lookup_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(Error::http("connection reset by peer"));
        }

        let name = Self::fqdn(domain, subdomain);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name && r.record_type == record_type.as_str())
            .cloned()
            .collect())
    }

    async fn create(&self, domain: &str, record: &VendorRecord) -> Result<Option<String>> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.reject_writes {
            return Err(Error::vendor_rejection(Some(message.clone())));
        }

        self.created
            .lock()
            .unwrap()
            .push((domain.to_string(), record.clone()));

        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.records
            .lock()
            .unwrap()
            .push(existing(
                &id,
                &Self::fqdn(domain, &record.name),
                record.record_type.as_str(),
                &record.content,
                record.prio.as_deref(),
            ));
        Ok(Some(id))
    }

    async fn edit(&self, domain: &str, record_id: &str, record: &VendorRecord) -> Result<()> {
        self.edit_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.reject_writes {
            return Err(Error::vendor_rejection(Some(message.clone())));
        }

        self.edited
            .lock()
            .unwrap()
            .push((record_id.to_string(), record.clone()));

        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == record_id) {
            Some(existing) => {
                existing.content = record.content.clone();
                existing.ttl = Some(record.ttl.clone());
                existing.prio = record.prio.clone();
                Ok(())
            }
            None => Err(Error::vendor_rejection(Some(format!(
                "Record {} not found in {}",
                record_id, domain
            )))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A resolver that answers from a fixed table
pub struct MockResolver {
    answers: HashMap<(String, RecordType), Vec<RawAnswer>>,
    nx_domains: Vec<String>,
    failing: Vec<(String, RecordType)>,
    /// Every (domain, type) queried, in order
    queries: Arc<Mutex<Vec<(String, RecordType)>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            nx_domains: Vec::new(),
            failing: Vec::new(),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `record_type` queries for `domain`
    pub fn with_answers(mut self, domain: &str, record_type: RecordType, answers: Vec<RawAnswer>) -> Self {
        self.answers.insert((domain.to_string(), record_type), answers);
        self
    }

    /// Answer NXDOMAIN for every query of `domain`
    pub fn with_nx_domain(mut self, domain: &str) -> Self {
        self.nx_domains.push(domain.to_string());
        self
    }

    /// Fail `record_type` queries for `domain` with a transport error
    pub fn with_failure(mut self, domain: &str, record_type: RecordType) -> Self {
        self.failing.push((domain.to_string(), record_type));
        self
    }

    pub fn queries(&self) -> Vec<(String, RecordType)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RecordResolver for MockResolver {
    async fn resolve(&self, domain: &str, record_type: RecordType) -> Result<Vec<RawAnswer>> {
        self.queries
            .lock()
            .unwrap()
            .push((domain.to_string(), record_type));

        if self.nx_domains.iter().any(|d| d == domain) {
            return Err(Error::nx_domain(domain));
        }
        if self
            .failing
            .iter()
            .any(|(d, t)| d == domain && *t == record_type)
        {
            return Err(Error::resolver("SERVFAIL"));
        }

        match self.answers.get(&(domain.to_string(), record_type)) {
            Some(answers) => Ok(answers.clone()),
            None => Err(Error::no_answer(domain, record_type)),
        }
    }
}

/// Build a provider-side record
pub fn existing(
    id: &str,
    name: &str,
    record_type: &str,
    content: &str,
    prio: Option<&str>,
) -> ExistingRecord {
    ExistingRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        ttl: Some("600".to_string()),
        prio: prio.map(str::to_string),
        notes: None,
    }
}
