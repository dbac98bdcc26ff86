use chrono::NaiveDate;
use spk_pdf::layout::{
    Element, LayoutEngine, PageGeometry, SignatureSlot, TextStyle, SIGNATURE_ALLOWANCE, SIGNATURE_HEIGHT,
};
use spk_pdf::numbering::sequence_number;
use spk_pdf::storage::SPK_SEQ_KEY;
use spk_pdf::{
    compose_invoice, compose_spk, compute_amounts, derive_rates, ContractForm, CounterStore, DocumentKind,
    MemoryStore, Rates, TaxScheme,
};

fn engine() -> LayoutEngine {
    LayoutEngine::new(PageGeometry::default())
}

fn sample_form() -> ContractForm {
    ContractForm {
        kol_name: "Sari Wulandari".into(),
        kol_address: "Jl. Kenanga No. 12, RT 03/RW 05, Kelurahan Cempaka Putih, Jakarta Pusat".into(),
        kol_ktp: "3171234567890123".into(),
        kol_npwp: "09.254.294.3-407.000".into(),
        kol_bank_name: "Bank Mandiri".into(),
        kol_bank_acc: "1230009876543".into(),
        campaign_name: "Ramadhan Glow".into(),
        fee_input: 10_000_000.0,
        spk_issue_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        script_deadline: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        upload_deadline: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
        ..ContractForm::default()
    }
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_three_line_paragraph_with_one_line_left_moves_whole() {
    let mut e = engine();
    let style = TextStyle::body(e.geometry());
    e.advance(e.remaining() - 1.5 * style.line_height);

    e.add_text_block("baris pertama\nbaris kedua\nbaris ketiga", &style);

    let doc = e.finish();
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.pages[0].lines().count(), 0);
    let moved: Vec<_> = doc.pages[1].lines().collect();
    assert_eq!(moved.len(), 3);
    assert_eq!(moved[0], (55.0, "baris pertama"));
}

#[test]
fn test_paragraph_splits_when_two_lines_fit() {
    let mut e = engine();
    let style = TextStyle::body(e.geometry());
    e.advance(e.remaining() - 2.5 * style.line_height);

    e.add_text_block("satu\ndua\ntiga", &style);

    let doc = e.finish();
    assert_eq!(doc.pages[0].lines().count(), 2);
    assert_eq!(doc.pages[1].lines().count(), 1);
}

#[test]
fn test_single_line_uses_last_slot() {
    let mut e = engine();
    let style = TextStyle::body(e.geometry());
    e.advance(e.remaining() - 1.5 * style.line_height);

    e.add_text_block("cukup satu baris", &style);

    assert_eq!(e.page_count(), 1);
}

#[test]
fn test_box_that_does_not_fit_starts_on_fresh_page() {
    let mut e = engine();
    let g = *e.geometry();
    e.advance(e.remaining() - 40.0);

    // 4 lines need 4 * 13 + 16 = 68 points.
    e.add_box(&["Bank: BCA", "No. Rekening: 123", "a.n. Sari", "Cabang: Sudirman"]);

    let doc = e.finish();
    assert_eq!(doc.page_count(), 2);
    assert!(doc.pages[0].elements.is_empty());
    match doc.pages[1].elements.first() {
        Some(Element::RoundedRect { y, height, .. }) => {
            assert_eq!(*y, g.margin);
            assert_eq!(*height, 68.0);
        }
        other => panic!("expected the border first, got {:?}", other),
    }
    let first_line = doc.pages[1].lines().next().map(|(y, _)| y);
    assert_eq!(first_line, Some(g.margin + g.box_padding + g.box_line_height - 3.0));
}

#[test]
fn test_box_that_fits_stays_on_page() {
    let mut e = engine();
    e.advance(e.remaining() - 80.0);
    e.add_box(&["a", "b", "c", "d"]);
    assert_eq!(e.page_count(), 1);
}

#[test]
fn test_signature_block_moves_to_new_page_when_short_of_room() {
    for room in [30.0, 45.0, 59.0] {
        let mut e = engine();
        let g = *e.geometry();
        e.advance(e.remaining() - room);

        e.add_signature_block(
            &SignatureSlot::new("PIHAK PERTAMA", "David Jr. M"),
            Some(&SignatureSlot::new("PIHAK KEDUA", "Sari Wulandari")),
        );

        let doc = e.finish();
        assert_eq!(doc.page_count(), 2, "room {}", room);
        assert_eq!(doc.pages[0].lines().count(), 0);
        let lines: Vec<_> = doc.pages[1].lines().collect();
        assert_eq!(lines[0], (g.margin, "PIHAK PERTAMA"));
        assert_eq!(lines[1], (g.margin, "PIHAK KEDUA"));
        assert_eq!(lines[2].0, g.margin + SIGNATURE_HEIGHT);
    }
}

#[test]
fn test_date_line_stays_with_signatures() {
    let mut e = engine();
    let g = *e.geometry();
    let style = TextStyle::body(&g);
    e.advance(e.remaining() - 70.0);

    e.ensure_space(SIGNATURE_ALLOWANCE);
    e.add_text_block("Jakarta, 2/3/2026", &style);
    e.add_signature_block(
        &SignatureSlot::new("PIHAK PERTAMA", "David Jr. M"),
        Some(&SignatureSlot::new("PIHAK KEDUA", "Sari Wulandari")),
    );

    let doc = e.finish();
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.pages[0].lines().count(), 0);
    let lines: Vec<_> = doc.pages[1].lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], (g.margin, "Jakarta, 2/3/2026"));
    assert_eq!(lines[1].0, lines[2].0);
    assert_eq!(lines[3].0, lines[4].0);
}

#[test]
fn test_composed_signatures_share_the_date_line_page() {
    let form = ContractForm {
        deliverable_desc: "Satu video TikTok dengan durasi minimal enam puluh detik. ".repeat(25),
        ..sample_form()
    };
    for extra in 0..40 {
        let mut form = form.clone();
        form.deliverable_desc.push_str(&"x ".repeat(extra * 3));
        let doc = compose_spk(&form, &form.amounts(), "X", PageGeometry::default());
        let last = doc.pages.last().unwrap();
        assert!(last.lines().any(|(_, text)| text == "Jakarta, 2/3/2026"), "extra {}", extra);
        assert!(last.lines().any(|(_, text)| text == "PIHAK KEDUA"), "extra {}", extra);
    }
}

#[test]
fn test_no_line_starts_below_bottom_limit() {
    let form = ContractForm {
        deliverable_desc: "Dua video TikTok dan tiga Instagram Story dengan tautan promo. ".repeat(60),
        kol_address: "Perumahan Griya Asri Blok C ".repeat(30),
        ..sample_form()
    };
    let doc = compose_spk(&form, &form.amounts(), "SPK/2026/03/0001/SVY", PageGeometry::default());
    let limit = doc.geometry.bottom_limit();
    assert!(doc.page_count() >= 3);
    for page in &doc.pages {
        for (y, text) in page.lines() {
            assert!(y <= limit, "line {:?} starts at {} below {}", text, y, limit);
        }
    }
}

#[test]
fn test_layout_is_deterministic() {
    let form = sample_form();
    let amounts = form.amounts();
    let a = compose_spk(&form, &amounts, "SPK/2026/03/0001/SVY", PageGeometry::default());
    let b = compose_spk(&form, &amounts, "SPK/2026/03/0001/SVY", PageGeometry::default());
    assert_eq!(a, b);

    let rates = form.rates();
    let c = compose_invoice(&form, &amounts, &rates, "INV/2026/03/0001/SVY", PageGeometry::default());
    let d = compose_invoice(&form, &amounts, &rates, "INV/2026/03/0001/SVY", PageGeometry::default());
    assert_eq!(c, d);
}

#[test]
fn test_smaller_page_needs_more_pages() {
    let form = sample_form();
    let amounts = form.amounts();
    let a4 = compose_spk(&form, &amounts, "X", PageGeometry::default());
    let a5 = compose_spk(
        &form,
        &amounts,
        "X",
        PageGeometry {
            width: 419.53,
            height: 595.28,
            margin: 36.0,
            ..PageGeometry::default()
        },
    );
    assert!(a5.page_count() > a4.page_count());
}

// ============================================================================
// End-to-end amounts and numbering
// ============================================================================

#[test]
fn test_final_turnover_without_vat() {
    let rates = derive_rates(&TaxScheme::FinalTurnoverTax, false);
    let a = compute_amounts(10_000_000.0, false, rates);
    assert_eq!(a.gross, 10_000_000.0);
    assert_eq!(a.withholding, 50_000.0);
    assert_eq!(a.vat_amount, 0.0);
    assert_eq!(a.net_to_party, 9_950_000.0);
}

#[test]
fn test_gross_up_service_withholding_with_vat() {
    let rates = derive_rates(&TaxScheme::ServiceWithholding, true);
    assert_eq!(rates, Rates { withholding: 0.02, vat: 0.11 });
    let a = compute_amounts(10_000_000.0, true, rates);
    assert!((a.gross - 9_174_311.93).abs() < 0.01);
    assert!((a.net_to_party - 10_000_000.0).abs() < 1e-6);
}

#[test]
fn test_sequence_counter_moves_by_exactly_n() {
    let mut store = MemoryStore::new();
    let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let before = store.current(SPK_SEQ_KEY);
    let numbers: Vec<String> = (0..7)
        .map(|_| sequence_number(DocumentKind::Spk, &date, &mut store))
        .collect();
    assert_eq!(store.current(SPK_SEQ_KEY), before + 7);
    assert_eq!(numbers.last().map(String::as_str), Some("SPK/2026/10/0007/SVY"));
    let mut deduped = numbers.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), numbers.len());
}
