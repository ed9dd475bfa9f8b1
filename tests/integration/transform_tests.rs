//! Transformation pipeline tests on realistic upstream payloads

use pubmed_search::{format_ama_citation, parse_guideline_summaries, parse_summaries, to_citations};
use rstest::rstest;

const ESUMMARY_JSON: &str = r#"{
    "header": {"type": "esummary", "version": "0.3"},
    "result": {
        "uids": ["31978945", "32007143", "99999999999"],
        "31978945": {
            "uid": "31978945",
            "pubdate": "2020 Feb 20",
            "epubdate": "2020 Jan 24",
            "source": "N Engl J Med",
            "authors": [
                {"name": "Zhu N", "authtype": "Author", "clusterid": ""},
                {"name": "Zhang D", "authtype": "Author", "clusterid": ""},
                {"name": "Wang W", "authtype": "Author", "clusterid": ""},
                {"name": "Li X", "authtype": "Author", "clusterid": ""},
                {"name": "Yang B", "authtype": "Author", "clusterid": ""},
                {"name": "Song J", "authtype": "Author", "clusterid": ""},
                {"name": "Zhao X", "authtype": "Author", "clusterid": ""}
            ],
            "title": "A Novel Coronavirus from Patients with Pneumonia in China, 2019",
            "volume": "382",
            "issue": "8",
            "pages": "727-733",
            "fulljournalname": "The New England journal of medicine"
        },
        "32007143": {
            "uid": "32007143",
            "pubdate": "2020 Feb 15",
            "source": "Lancet",
            "authors": [{"name": "Huang C", "authtype": "Author", "clusterid": ""}],
            "title": "Clinical features of patients infected with 2019 novel coronavirus in Wuhan, China",
            "volume": "395",
            "issue": "10223",
            "pages": "497-506"
        },
        "99999999999": {
            "uid": "99999999999",
            "error": "cannot get document summary"
        }
    }
}"#;

const EFETCH_XML: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet SYSTEM "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
    <PubmedArticle>
        <MedlineCitation Status="MEDLINE" Owner="NLM">
            <PMID Version="1">35363499</PMID>
            <Article PubModel="Print-Electronic">
                <Journal>
                    <ISSN IssnType="Electronic">1524-4539</ISSN>
                    <JournalIssue CitedMedium="Internet">
                        <Volume>145</Volume>
                        <Issue>18</Issue>
                        <PubDate>
                            <Year>2022</Year>
                            <Month>May</Month>
                            <Day>03</Day>
                        </PubDate>
                    </JournalIssue>
                    <Title>Circulation</Title>
                    <ISOAbbreviation>Circulation</ISOAbbreviation>
                </Journal>
                <ArticleTitle>2022 AHA/ACC/HFSA Guideline for the Management of <i>Heart Failure</i></ArticleTitle>
                <Pagination>
                    <MedlinePgn>e895-e1032</MedlinePgn>
                </Pagination>
                <AuthorList CompleteYN="Y">
                    <Author ValidYN="Y">
                        <LastName>Heidenreich</LastName>
                        <ForeName>Paul A</ForeName>
                        <Initials>PA</Initials>
                    </Author>
                    <Author ValidYN="Y">
                        <LastName>Bozkurt</LastName>
                        <ForeName>Biykem</ForeName>
                        <Initials>B</Initials>
                    </Author>
                </AuthorList>
            </Article>
        </MedlineCitation>
    </PubmedArticle>
</PubmedArticleSet>"#;

#[test]
fn test_esummary_payload_to_summaries() {
    let summaries = parse_summaries(ESUMMARY_JSON).unwrap();

    // The error-marked UID is dropped, order of the rest is preserved
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].pmid, "31978945");
    assert_eq!(summaries[0].authors.len(), 7);
    assert_eq!(summaries[1].pmid, "32007143");
    assert_eq!(summaries[1].journal, "Lancet");
    assert_eq!(summaries[1].year, Some(2020));
}

#[test]
fn test_esummary_payload_to_citations_with_truncation() {
    let summaries = parse_summaries(ESUMMARY_JSON).unwrap();
    let citations = to_citations(&summaries, 6);

    assert_eq!(citations.len(), 2);
    assert_eq!(
        citations[0].citation,
        "Zhu N, Zhang D, Wang W, Li X, Yang B, Song J, et al. A Novel Coronavirus from Patients with Pneumonia in China, 2019. *N Engl J Med*. 2020; 382(8):727-733."
    );
    assert_eq!(
        citations[0].link,
        "https://pubmed.ncbi.nlm.nih.gov/31978945/"
    );
    assert_eq!(
        citations[1].link,
        "https://pubmed.ncbi.nlm.nih.gov/32007143/"
    );
}

#[test]
fn test_efetch_payload_to_guideline_summaries() {
    let summaries = parse_guideline_summaries(EFETCH_XML).unwrap();

    assert_eq!(summaries.len(), 1);
    let s = &summaries[0];
    assert_eq!(s.pmid, "35363499");
    assert_eq!(
        s.title,
        "2022 AHA/ACC/HFSA Guideline for the Management of Heart Failure"
    );
    assert_eq!(s.authors, vec!["Heidenreich PA", "Bozkurt B"]);
    assert_eq!(s.journal, "Circulation");
    assert_eq!(s.year, Some(2022));
    assert_eq!(s.volume.as_deref(), Some("145"));
    assert_eq!(s.issue.as_deref(), Some("18"));
    assert_eq!(s.pages.as_deref(), Some("e895-e1032"));
}

#[test]
fn test_efetch_summaries_format_as_citations() {
    let summaries = parse_guideline_summaries(EFETCH_XML).unwrap();
    let citation = format_ama_citation(&summaries[0], 6);

    assert_eq!(
        citation,
        "Heidenreich PA, Bozkurt B. 2022 AHA/ACC/HFSA Guideline for the Management of Heart Failure. *Circulation*. 2022; 145(18):e895-e1032."
    );
}

#[rstest]
#[case::empty_json("", 0)]
#[case::no_uids(r#"{"result":{"uids":[]}}"#, 0)]
fn test_degenerate_esummary_payloads(#[case] payload: &str, #[case] expected: usize) {
    assert_eq!(parse_summaries(payload).unwrap().len(), expected);
}

#[test]
fn test_malformed_payloads_are_errors() {
    assert!(parse_summaries("<html>Bad Gateway</html>").is_err());
    assert!(parse_guideline_summaries("{\"not\": \"xml\"}").is_err());
}
