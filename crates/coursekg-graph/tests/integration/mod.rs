mod ingestion;
mod persistence;
mod properties;
mod retrieval;
