use std::collections::HashMap;

use anyhow::{Context, Result, bail};

use barkeep_core::filter::SuggestionQuery;
use barkeep_core::models::{BarcodeProduct, Ingredient, RecipeSummary, ShoppingListLine, Synonym};
use barkeep_core::service::BarApi;

pub struct BarApiClient {
    client: reqwest::Client,
    base: String,
    rt: tokio::runtime::Handle,
}

impl BarApiClient {
    pub fn new(base: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!("barkeep-cli/{}", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            rt: tokio::runtime::Handle::current(),
        }
    }

    pub async fn synonyms_async(&self) -> Result<Vec<Synonym>> {
        self.get_json("synonyms/").await
    }

    pub async fn unit_synonyms_async(&self) -> Result<Vec<Synonym>> {
        self.get_json("unit-synonyms/").await
    }

    pub async fn shopping_list_async(&self) -> Result<Vec<ShoppingListLine>> {
        self.get_json("shopping-list/").await
    }

    pub async fn ingredients_async(&self) -> Result<Vec<Ingredient>> {
        self.get_json("ingredients/").await
    }

    pub async fn suggestions_async(&self, query: &SuggestionQuery) -> Result<Vec<RecipeSummary>> {
        let resp = self
            .client
            .post(format!("{}/suggestions/", self.base))
            .json(query)
            .send()
            .await
            .context("Failed to reach bar API")?;
        if !resp.status().is_success() {
            bail!("Bar API returned {} for suggestions", resp.status());
        }
        resp.json().await.context("Failed to parse suggestions")
    }

    pub async fn add_synonym_async(&self, alias: &str, canonical: &str) -> Result<Synonym> {
        let body = Synonym {
            alias: alias.to_string(),
            canonical: canonical.to_string(),
        };
        let resp = self
            .client
            .post(format!("{}/synonyms/", self.base))
            .json(&body)
            .send()
            .await
            .context("Failed to reach bar API")?;
        if !resp.status().is_success() {
            bail!("Bar API returned {} for synonym add", resp.status());
        }
        resp.json().await.context("Failed to parse synonym")
    }

    pub async fn delete_synonym_async(&self, alias: &str) -> Result<()> {
        let resp = self
            .client
            .delete(format!("{}/synonyms/{alias}", self.base))
            .send()
            .await
            .context("Failed to reach bar API")?;
        if !resp.status().is_success() {
            bail!("Bar API returned {} for synonym delete", resp.status());
        }
        Ok(())
    }

    pub async fn import_synonyms_async(&self, mapping: &HashMap<String, String>) -> Result<()> {
        let resp = self
            .client
            .post(format!("{}/synonyms/import/", self.base))
            .json(mapping)
            .send()
            .await
            .context("Failed to reach bar API")?;
        if !resp.status().is_success() {
            bail!("Bar API returned {} for synonym import", resp.status());
        }
        Ok(())
    }

    /// Any non-success status is treated as "no product", matching the
    /// lookup's best-effort contract.
    pub async fn lookup_barcode_async(&self, code: &str) -> Result<Option<BarcodeProduct>> {
        let resp = self
            .client
            .get(format!("{}/barcode/{code}", self.base))
            .send()
            .await
            .context("Failed to reach bar API")?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let product: BarcodeProduct =
            resp.json().await.context("Failed to parse barcode lookup")?;
        Ok(Some(product))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{path}", self.base);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach bar API")?;
        if !resp.status().is_success() {
            bail!("Bar API returned {} for {url}", resp.status());
        }
        resp.json()
            .await
            .with_context(|| format!("Failed to parse response from {url}"))
    }
}

impl BarApi for BarApiClient {
    fn fetch_synonyms(&self) -> Result<Vec<Synonym>> {
        self.rt.block_on(self.synonyms_async())
    }

    fn fetch_unit_synonyms(&self) -> Result<Vec<Synonym>> {
        self.rt.block_on(self.unit_synonyms_async())
    }

    fn fetch_shopping_list(&self) -> Result<Vec<ShoppingListLine>> {
        self.rt.block_on(self.shopping_list_async())
    }

    fn fetch_ingredients(&self) -> Result<Vec<Ingredient>> {
        self.rt.block_on(self.ingredients_async())
    }

    fn fetch_suggestions(&self, query: &SuggestionQuery) -> Result<Vec<RecipeSummary>> {
        self.rt.block_on(self.suggestions_async(query))
    }

    fn import_synonyms(&self, mapping: &HashMap<String, String>) -> Result<()> {
        self.rt.block_on(self.import_synonyms_async(mapping))
    }

    fn lookup_barcode(&self, code: &str) -> Result<Option<BarcodeProduct>> {
        self.rt.block_on(self.lookup_barcode_async(code))
    }
}
