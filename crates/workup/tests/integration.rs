use workup_core::annotation;
use workup_core::modification::TagSet;
use workup_core::table::{infer_delimiter, read_column, PEPTIDE_COLUMN};

const EXPORT: &str = "../../tests/de_novo_peptides.csv";

#[test]
fn integration() -> anyhow::Result<()> {
    let column = read_column(EXPORT, infer_delimiter(EXPORT), PEPTIDE_COLUMN)?;
    assert_eq!(column.len(), 5);
    assert_eq!(column.values[1], "M(+15.99)PEPTC(+57.02)K");

    let mut exported = Vec::new();
    column.write(&mut exported, b',')?;
    let text = String::from_utf8(exported.clone())?;
    assert_eq!(text.lines().count(), 5);
    assert!(!text.contains("Peptide"));

    let mut groups = Vec::new();
    let summary = annotation::strip(exported.as_slice(), &mut groups)?;
    assert_eq!(summary.lines, 5);
    assert_eq!(
        String::from_utf8(groups)?,
        "+15.99\n+57.02\n+.98\n+79.97\n+.98\n+15.99\n"
    );

    let mut cleaned = Vec::new();
    let summary = TagSet::default().remove(exported.as_slice(), &mut cleaned)?;
    assert_eq!(summary.lines, 5);
    assert_eq!(
        String::from_utf8(cleaned)?,
        "LLSLSSLK\nMPEPTCK\nVNLTAR\nAVDLLGHK\nS(+79.97)AENMK\n"
    );

    Ok(())
}

#[test]
fn tab_separated_export() -> anyhow::Result<()> {
    let path = "../../tests/de_novo_peptides.tsv";
    assert_eq!(infer_delimiter(path), b'\t');
    let column = read_column(path, infer_delimiter(path), PEPTIDE_COLUMN)?;
    assert_eq!(
        column.values,
        vec!["LLSLSSLK", "M(+15.99)PEPTC(+57.02)K", "VN(+.98)LTAR"]
    );
    Ok(())
}

#[test]
fn missing_export() {
    let err = read_column("../../tests/missing.csv", b',', PEPTIDE_COLUMN).unwrap_err();
    assert!(matches!(err, workup_core::Error::Io { .. }));
}
