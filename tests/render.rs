use clusterplot::{
    parse::{parse_annotations, Format},
    plot::{LayoutParams, PlotData},
    svg::{header, FOOTER},
};
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn genbank_record(name: &str, len: usize, features: &[&str]) -> String {
    let mut out = format!(
        "LOCUS       {name:<16}{len:>12} bp    DNA     linear   BCT 01-JAN-2020\n\
         DEFINITION  Test cluster.\n\
         FEATURES             Location/Qualifiers\n"
    );
    for feature in features {
        out.push_str(feature);
    }
    out.push_str("ORIGIN\n");
    let bases = "gattaca".repeat(len / 7 + 1);
    for (i, line) in bases.as_bytes()[..len].chunks(60).enumerate() {
        out.push_str(&format!("{:>9}", i * 60 + 1));
        for block in line.chunks(10) {
            out.push(' ');
            out.push_str(std::str::from_utf8(block).unwrap());
        }
        out.push('\n');
    }
    out.push_str("//\n");
    out
}

fn cds(location: &str, gene: &str) -> String {
    format!(
        "     CDS             {location}\n                     /gene=\"{gene}\"\n"
    )
}

#[test]
fn one_gene_cluster() {
    let gene = cds("<1..>500", "geneA");
    let gb = genbank_record("CLUSTER1", 1000, &[&gene]);
    let file = temp_file(".gbk", &gb);

    let records = parse_annotations(file.path(), Format::Auto).unwrap();
    let svg = PlotData::new(records)
        .render(&LayoutParams::default())
        .to_svg();

    assert!(svg.starts_with(&header(870.0, 300.0)));
    assert!(svg.ends_with(FOOTER));
    assert_eq!(svg.matches("<line").count(), 1);
    assert!(svg.contains(r#"<line x1="100" y1="30" x2="110" y2="30""#));
    assert_eq!(svg.matches("<polygon").count(), 1);
    assert!(svg.contains(r#"points="100,30 100,30 100,22 105,40 100,58 100,50 100,50""#));
    assert_eq!(svg.matches("<text").count(), 1);
    assert!(svg.contains(r#"<text x="85" y="80""#));
    assert!(svg.contains(">geneA</text>"));
}

#[test]
fn two_records_get_two_tracks() {
    let a = cds("1..3000", "dnaA");
    let b = cds("complement(3101..6000)", "dnaB");
    let mut gb = genbank_record("FIRST", 6000, &[&a, &b]);
    gb.push_str(&genbank_record("SECOND", 2000, &[&cds("200..1800", "recA")]));
    let file = temp_file(".gb", &gb);

    let records = parse_annotations(file.path(), Format::GenBank).unwrap();
    assert_eq!(records.len(), 2);

    let document = PlotData::new(records).render(&LayoutParams::default());
    let baselines: Vec<_> = document.lines().map(|l| (l.start.y, l.end.x)).collect();
    assert_eq!(baselines, vec![(30.0, 160.0), (180.0, 120.0)]);

    let tips: Vec<_> = document.polygons().map(|g| g.tip()).collect();
    assert_eq!(tips.len(), 3);
    // dnaB is reverse: tip on the left at its start
    assert_eq!(tips[1].x, 131.0);
    assert_eq!(tips[1].y, 40.0);
    assert_eq!(tips[2].y, 190.0);
}

#[test]
fn gff_input_renders() {
    let gff = "##gff-version 3\n\
               contig_1\tprodigal\tCDS\t1\t1200\t.\t+\t0\tID=c1;Name=orf1\n\
               contig_1\tprodigal\tCDS\t1301\t2000\t.\t-\t0\tID=c2;Name=orf2\n";
    let file = temp_file(".gff", gff);

    let records = parse_annotations(file.path(), Format::Auto).unwrap();
    let svg = PlotData::new(records)
        .render(&LayoutParams::default())
        .to_svg();

    assert_eq!(svg.matches("<polygon").count(), 2);
    assert!(svg.contains(">orf1</text>"));
    assert!(svg.contains(">orf2</text>"));
    // the track ends with the last CDS
    assert!(svg.contains(r#"x2="120" y2="30""#));
}

#[test]
fn genes_across_the_origin_are_drawn() {
    let wrap = cds("join(901..1000,1..100)", "oriX");
    let split = cds("join(complement(601..700),complement(501..550))", "revY");
    let gb = genbank_record("CIRC", 1000, &[&wrap, &split]);
    let file = temp_file(".gbk", &gb);

    let records = parse_annotations(file.path(), Format::Auto).unwrap();
    let document = PlotData::new(records).render(&LayoutParams::default());

    let tips: Vec<_> = document.polygons().map(|g| g.tip().x).collect();
    // oriX spans the whole record, revY points left from bp 500
    assert_eq!(tips, vec![110.0, 105.0]);
    let names: Vec<_> = document.texts().map(|t| t.2).collect();
    assert_eq!(names, vec!["oriX", "revY"]);
}

#[test]
fn many_records_fit_on_the_canvas() {
    let mut gb = String::new();
    for i in 0..3 {
        gb.push_str(&genbank_record(&format!("REC{i}"), 1000, &[&cds("1..500", "geneA")]));
    }
    let file = temp_file(".gb", &gb);

    let records = parse_annotations(file.path(), Format::Auto).unwrap();
    let svg = PlotData::new(records)
        .render(&LayoutParams::default())
        .to_svg();

    assert!(svg.starts_with(&header(870.0, 600.0)));
    assert!(svg.contains(r#"<line x1="100" y1="330""#));
}
