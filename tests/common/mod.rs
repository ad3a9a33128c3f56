#![allow(dead_code)]

use async_trait::async_trait;
use listing_monitor::scrapers::{FetchOutcome, ListingExtractor, Markers, PageFetcher};
use listing_monitor::Pipeline;
use std::sync::{Arc, Mutex};

/// Fetcher returning a swappable canned outcome, recording requested URLs
pub struct StubFetcher {
    outcome: Mutex<FetchOutcome>,
    pub requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new(outcome: FetchOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(outcome),
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn set(&self, outcome: FetchOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        self.requested.lock().unwrap().push(url.to_string());
        self.outcome.lock().unwrap().clone()
    }

    fn source_name(&self) -> &'static str {
        "stub"
    }
}

pub fn pipeline(fetcher: Arc<dyn PageFetcher>) -> Pipeline {
    let extractor = ListingExtractor::new(&Markers::default()).unwrap();
    Pipeline::new(fetcher, extractor)
}

pub fn count_page(text: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body>
            <h1 class="page-title-root">Объявления <span class="page-title-count-wQ7pG">{}</span></h1>
        </body></html>"#,
        text
    )
}

pub fn listing_card(n: usize) -> String {
    format!(
        r#"<div class="iva-item-content-rejJg">
            <a><h3 class="iva-item-titleStep-pdebR">Велосипед {n}</h3></a>
            <div class="iva-item-descriptionStep-C0ty1">Состояние отличное</div>
            <p class="iva-item-priceStep-uq2CQ">{n}5 000 ₽</p>
            <div class="geo-root-zPwRk"><span>Москва, м. Сокол</span></div>
            <div class="iva-item-dateInfoStep-_acjp">{n} дня назад</div>
        </div>"#
    )
}

pub fn listings_page(count: usize) -> String {
    let cards: Vec<String> = (1..=count).map(listing_card).collect();
    format!("<!DOCTYPE html><html><body>{}</body></html>", cards.join("\n"))
}

pub fn success(body: String) -> FetchOutcome {
    FetchOutcome::Success { body }
}
