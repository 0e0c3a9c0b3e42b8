//! Shared test utilities and fixtures for taxonomy tests

use crate::Result;
use crate::app::services::retrieval::PageSource;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};


/// Header row of the taxonomy reference table
pub const TEST_HEADER: &str =
    "TAXON_ORDER,CATEGORY,SPECIES_CODE,PRIMARY_COM_NAME,SCI_NAME,ORDER1,FAMILY,SPECIES_GROUP,REPORT_AS";

/// Create a small but realistic taxonomy table
pub fn create_test_taxonomy_csv() -> String {
    format!(
        "{}\n\
         336,species,mallar3,Mallard,Anas platyrhynchos,Anseriformes,Anatidae (Ducks Geese and Waterfowl),,\n\
         400,spuh,duck1,duck sp.,Anatinae sp.,Anseriformes,Anatidae (Ducks Geese and Waterfowl),,\n\
         411,slash,y00011,Greater/Lesser Scaup,Aythya marila/affinis,Anseriformes,Anatidae (Ducks Geese and Waterfowl),,\n\
         31712,species,daejun,Dark-eyed Junco,Junco hyemalis,Passeriformes,Passerellidae (New World Sparrows),,\n\
         31720,issf,slcjun,\"Dark-eyed Junco (Slate-colored)\",Junco hyemalis hyemalis/carolinensis,Passeriformes,Passerellidae (New World Sparrows),,daejun\n",
        TEST_HEADER
    )
}

/// Write a taxonomy table into `dir` and return its path
pub fn write_test_taxonomy(dir: &Path, content: &str) -> std::io::Result<PathBuf> {
    let path = dir.join("eBird_Taxonomy.csv");
    fs::write(&path, content)?;
    Ok(path)
}

/// Page source that always returns the same body and counts its calls
pub struct StaticPageSource {
    pub body: String,
    pub calls: AtomicUsize,
}

impl StaticPageSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl PageSource for StaticPageSource {
    fn fetch(&self, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}
