//! Session-cached supplier directory and the three-tier supplier resolver.
//!
//! The full directory fetch is paginated and expensive, so it happens at
//! most once per process session and only when the fuzzy tier is actually
//! reached. The fuzzy threshold is strict (≥90 by default) because this
//! lookup decides which supplier an order — and its payment — is raised
//! against.

use cellarman_core::similarity::token_sort_ratio;
use cellarman_core::Conventions;
use tokio::sync::OnceCell;

use crate::client::Cin7Client;
use crate::error::Cin7Error;
use crate::types::SupplierRecord;

/// Supplier directory with process-lifetime caching.
pub struct SupplierDirectory {
    client: Cin7Client,
    page_size: u32,
    cache: OnceCell<Vec<SupplierRecord>>,
}

impl SupplierDirectory {
    #[must_use]
    pub fn new(client: Cin7Client, page_size: u32) -> Self {
        Self {
            client,
            page_size,
            cache: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &Cin7Client {
        &self.client
    }

    /// Returns the full supplier directory, fetching and caching it on first
    /// use. A page shorter than the page size marks the end of the listing.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`Cin7Error`] if the initial fetch fails; a
    /// failed fetch is not cached, so a later call retries.
    pub async fn all(&self) -> Result<&[SupplierRecord], Cin7Error> {
        let suppliers = self
            .cache
            .get_or_try_init(|| self.fetch_all())
            .await?;
        Ok(suppliers.as_slice())
    }

    async fn fetch_all(&self) -> Result<Vec<SupplierRecord>, Cin7Error> {
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let batch = self.client.supplier_page(page, self.page_size).await?;
            let batch_len = batch.len();
            all.extend(batch);
            if batch_len < self.page_size as usize {
                break;
            }
            page += 1;
        }
        tracing::info!(count = all.len(), "cached supplier directory");
        Ok(all)
    }

    /// Resolves an extracted supplier name to an inventory-system supplier.
    ///
    /// Three tiers, cheapest first:
    /// 1. exact name lookup;
    /// 2. the same lookup with `&` rewritten to `and` (`"Anspach & Hobday"`
    ///    → `"Anspach and Hobday"`);
    /// 3. fuzzy match against the cached full directory, accepted only at or
    ///    above `conventions.supplier_fuzzy_threshold`.
    ///
    /// `Ok(None)` — no tier produced a supplier — is a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`Cin7Error`] on transport failure.
    pub async fn resolve(
        &self,
        name: &str,
        conventions: &Conventions,
    ) -> Result<Option<SupplierRecord>, Cin7Error> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(record) = self.client.supplier_by_name(name).await? {
            return Ok(Some(record));
        }

        if name.contains('&') {
            let rewritten = name.replace('&', "and");
            if let Some(record) = self.client.supplier_by_name(&rewritten).await? {
                tracing::info!(extracted = name, matched = %record.name, "supplier resolved via ampersand rewrite");
                return Ok(Some(record));
            }
        }

        let directory = self.all().await?;
        let best = directory
            .iter()
            .map(|record| (token_sort_ratio(name, &record.name), record))
            .max_by_key(|(score, _)| *score);

        match best {
            Some((score, record)) if score >= conventions.supplier_fuzzy_threshold => {
                tracing::info!(
                    extracted = name,
                    matched = %record.name,
                    score,
                    "supplier resolved via fuzzy directory match"
                );
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }
}
