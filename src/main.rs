use anyhow::{Context, Result};
use clap::{arg, command, value_parser, ArgMatches, Command};
use clusterplot::{
    parse::{parse_annotations, Format},
    plot::{LayoutParams, PlotData},
    svg::{parse_rgb, DEFAULT_FILL},
};
use log::error;
use std::{path::PathBuf, process, str::FromStr};

fn cli() -> Command {
    command!()
        .about("Draw the CDS of a GenBank or GFF3 file as a gene cluster diagram (SVG on stdout)")
        .arg(arg!(<FILE> "The input GenBank or GFF3 file").value_parser(value_parser!(PathBuf)))
        .arg(
            arg!(-H --"arrow-height" <PX> "Thickness of the arrow shaft")
                .value_parser(value_parser!(f64))
                .default_value("20"),
        )
        .arg(
            arg!(-E --"head-edge" <PX> "Extra width of the arrow head above and below the shaft")
                .value_parser(value_parser!(f64))
                .default_value("8"),
        )
        .arg(
            arg!(-l --"head-length" <PX> "Length of the arrow head")
                .value_parser(value_parser!(f64))
                .default_value("10"),
        )
        .arg(
            arg!(-X --"margin-x" <PX> "Left margin")
                .value_parser(value_parser!(f64))
                .default_value("100"),
        )
        .arg(
            arg!(-Y --"margin-y" <PX> "Top margin")
                .value_parser(value_parser!(f64))
                .default_value("30"),
        )
        .arg(
            arg!(-S --scale <BP> "Base pairs per pixel (100 means 100 bp/px)")
                .value_parser(value_parser!(f64))
                .default_value("100.0"),
        )
        .arg(
            arg!(-F --"font-size" <PX> "Gene name font size")
                .value_parser(value_parser!(f64))
                .default_value("14"),
        )
        .arg(
            arg!(--"record-spacing" <PX> "Vertical distance between records of one file")
                .value_parser(value_parser!(f64))
                .default_value("150"),
        )
        .arg(
            arg!(--fill <RGB> "Arrow fill colour as R,G,B")
                .value_parser(parse_rgb)
                .default_value("204,204,204"),
        )
        .arg(
            arg!(--format <FORMAT> "Input format: auto, genbank or gff")
                .value_parser(Format::from_str)
                .default_value("auto"),
        )
        .after_help(
            "The SVG is printed on stdout; redirect it to save it:\n    \
             clusterplot cluster.gbk -S 50 > cluster.svg",
        )
}

fn number(matches: &ArgMatches, id: &str) -> Result<f64> {
    matches
        .get_one::<f64>(id)
        .copied()
        .with_context(|| format!("missing value for --{id}"))
}

fn layout(matches: &ArgMatches) -> Result<LayoutParams> {
    Ok(LayoutParams {
        arrow_height: number(matches, "arrow-height")?,
        head_edge: number(matches, "head-edge")?,
        head_length: number(matches, "head-length")?,
        margin_x: number(matches, "margin-x")?,
        margin_y: number(matches, "margin-y")?,
        scale: number(matches, "scale")?,
        font_size: number(matches, "font-size")?,
        record_spacing: number(matches, "record-spacing")?,
        fill: matches
            .get_one::<String>("fill")
            .cloned()
            .unwrap_or_else(|| DEFAULT_FILL.to_string()),
        ..LayoutParams::default()
    })
}

fn run(matches: &ArgMatches) -> Result<()> {
    let file = matches
        .get_one::<PathBuf>("FILE")
        .context("no input file given")?;
    let format = matches
        .get_one::<Format>("format")
        .copied()
        .unwrap_or(Format::Auto);

    let params = layout(matches)?;

    let records = parse_annotations(file, format)
        .with_context(|| format!("could not read annotations from {}", file.display()))?;

    PlotData::new(records).plot(&params)
}

fn main() {
    pretty_env_logger::init();

    let mut cmd = cli();
    let matches = cmd.clone().get_matches();

    if let Err(e) = run(&matches) {
        error!("{e:#}");
        eprintln!("{}", cmd.render_help());
        process::exit(1);
    }
}
