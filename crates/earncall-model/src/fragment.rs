/// One page of a document's content. Index 0 is the unnumbered base
/// fragment served at the document URL itself; numbered fragments start
/// at 1. No two fragments of one document share an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub index: u32,
    pub body: String,
}
