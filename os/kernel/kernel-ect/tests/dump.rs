#![cfg(feature = "dump")]

mod common;

use common::{BlockBuilder, Body, EctBuilder, cpu_pll_block};
use kernel_ect::dump::Node;
use kernel_ect::{BlockKind, Ect, Platform};

fn render(ect: &Ect<'_>, node: Node) -> String {
    let mut out = String::new();
    ect.dump(node, &mut out).unwrap();
    out
}

#[test]
fn pll_node_lists_coefficients() {
    let blob = EctBuilder::new().block("PLL", &cpu_pll_block()).build();
    let ect = Ect::parse(&blob, Platform::default()).unwrap();

    assert_eq!(
        render(&ect, Node::from_name("pll_dump").unwrap()),
        "[ECT] : PLL Information\n\
         \t[PARSER VERSION] : 1\n\
         \t[VERSION] : 0001\n\
         \t[NUM OF PLL] : 1\n\
         \t\t[PLL NAME] : CPU_PLL\n\
         \t\t[PLL TYPE] : 0\n\
         \t\t[NUM OF FREQUENCY] : 1\n\
         \t\t\t[FREQUENCY] : 1600000\n\
         \t\t\t[P] : 3\n\
         \t\t\t[M] : 100\n\
         \t\t\t[S] : 2\n\
         \t\t\t[K] : 0\n"
    );
}

#[test]
fn missing_block_prints_notice() {
    let blob = EctBuilder::new().build();
    let ect = Ect::parse(&blob, Platform::default()).unwrap();

    assert_eq!(
        render(&ect, Node::Block(BlockKind::Dvfs)),
        "[ECT] : there is no dvfs information\n"
    );
    assert_eq!(
        render(&ect, Node::Block(BlockKind::GenParam)),
        "[ECT] : there is no general parameter information\n"
    );
}

#[test]
fn header_node_shows_load_address() {
    let blob = EctBuilder::new().block("PLL", &cpu_pll_block()).build();
    let ect = Ect::parse_at(&blob, 0x9000_0000, Platform::default()).unwrap();

    let text = render(&ect, Node::Header);
    assert!(text.starts_with("[ECT] : ECT Information\n\t[PA] : 0x90000000\n"));
    assert!(text.contains("\t[SIGN] : PARA\n"));
    assert!(text.contains(&format!("\t[TOTAL SIZE] : {}\n", blob.len())));
    assert!(text.ends_with("\t[NUM OF HEADER] : 1\n"));
}

#[test]
fn all_node_follows_directory_order() {
    let params = BlockBuilder::new(1).record("T", Body::new().words(&[2, 1, 3, 4]));
    let blob = EctBuilder::new()
        .block("PLL", &cpu_pll_block())
        .block("GEN", &params)
        .build();
    let ect = Ect::parse(&blob, Platform::default()).unwrap();

    let text = render(&ect, Node::All);
    let header = text.find("[ECT] : ECT Information").unwrap();
    let pll = text.find("[ECT] : PLL Information").unwrap();
    let gen_param = text.find("[ECT] : General-Parameter Information").unwrap();
    assert!(header < pll && pll < gen_param);
    assert!(text.contains("\t\t\t[TABLE]\n\t\t\t3 4 \n"));
    assert!(!text.contains("there is no"));
}

#[test]
fn compact_margins_print_microvolts() {
    let margin = BlockBuilder::new(2).record("MIF", Body::new().words(&[2, 1]).bytes(&[2, 4]));
    let blob = EctBuilder::new().block("MARGIN", &margin).build();
    let ect = Ect::parse(&blob, Platform::default()).unwrap();

    let text = render(&ect, Node::Block(BlockKind::Margin));
    assert!(text.contains("\t\t[NUM OF GROUP] : 2\n\t\t[NUM OF LEVEL] : 1\n"));
    assert!(text.ends_with("\t\t\t[TABLE]\n\t\t\t12500 25000 \n"));
}

#[test]
fn dvfs_node_marks_disabled_levels() {
    let dvfs = BlockBuilder::new(2).record(
        "dvfs_mif",
        Body::new()
            .words(&[1_000, 100, 0])
            .i32(-1)
            .words(&[1, 2])
            .string("CLK_MIF")
            .u32(1_000)
            .i32(1)
            .u32(100)
            .i32(0)
            .words(&[7, 8]),
    );
    let blob = EctBuilder::new().block("DVFS", &dvfs).build();
    let ect = Ect::parse(&blob, Platform::default()).unwrap();

    let text = render(&ect, Node::Block(BlockKind::Dvfs));
    assert!(text.contains("\t\t[BOOT LEVEL IDX] : 0\n\t\t[RESUME LEVEL IDX] : NONE\n"));
    assert!(text.contains("\t\t\t[CLOCK NAME] : CLK_MIF\n"));
    assert!(text.contains("\t\t\t[LEVEL] : 1000(O)\n\t\t\t[LEVEL] : 100(X)\n"));
    assert!(text.ends_with("\t\t\t\t[TABLE]\n\t\t\t\t7 \n\t\t\t\t8 \n"));
}

#[test]
fn timing_node_prints_hex() {
    let timing = BlockBuilder::new(1).keyed(
        0x1_0000_0002,
        Body::new().words(&[1, 1, 1]).u64(0xAABB_CCDD_0000_0001),
    );
    let blob = EctBuilder::new().block("NEWTIMING", &timing).build();
    let ect = Ect::parse(&blob, Platform::default()).unwrap();

    let text = render(&ect, Node::Block(BlockKind::NewTimingParam));
    assert!(text.starts_with("[ECT] : New Timing-Parameter Information\n"));
    assert!(text.contains("\t\t[PARAMETER KEY] : 100000002\n"));
    assert!(text.ends_with("\t\t\t[TABLE]\n\t\t\tAABBCCDD00000001 \n"));
}
