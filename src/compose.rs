//! Agreement (SPK) and invoice templates driven through the layout engine.

use crate::amounts::{AmountBreakdown, InvoiceTotals};
use crate::format::{fmt_percent, format_long_date, format_short_date, idr};
use crate::form::{ContractForm, PaymentTerm};
use crate::layout::{Document, LayoutEngine, PageGeometry, SignatureSlot, TextStyle, SIGNATURE_ALLOWANCE};
use crate::rates::Rates;

const SIGNING_PLACE: &str = "Jakarta Selatan";
const SIGNING_CITY: &str = "Jakarta";
const KOL_NAME_PLACEHOLDER: &str = "(Nama KOL)";

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn kol_signature_name(form: &ContractForm) -> &str {
    if form.kol_name.trim().is_empty() {
        KOL_NAME_PLACEHOLDER
    } else {
        &form.kol_name
    }
}

// ============================================================================
// SPK
// ============================================================================

pub fn compose_spk(form: &ContractForm, amounts: &AmountBreakdown, number: &str, geometry: PageGeometry) -> Document {
    let mut page = LayoutEngine::new(geometry);
    let body = TextStyle::body(&geometry);
    let lh = geometry.line_height;

    page.add_heading("SURAT PERJANJIAN KERJASAMA", 14.0, lh * 1.8);
    page.add_heading("\"SOCIAL MEDIA ENDORSER/INFLUENCER\"", 11.0, lh * 1.4);
    page.add_heading(&format!("NO: {}", or_dash(number)), 11.0, lh * 2.0);

    // Recitals
    page.add_text_block(
        &format!(
            "Pada hari {} bertempat di {} dibuat dan ditandatangani Surat Perjanjian Kerjasama (\"Perjanjian\"), oleh dan antara:",
            format_long_date(&form.spk_issue_date),
            SIGNING_PLACE
        ),
        &body,
    );
    page.add_text_block(
        &format!(
            "{}, selaku Direktur {} beralamat di {}, mewakili klien dalam kampanye {}, selanjutnya disebut PIHAK PERTAMA; dengan:",
            form.company_representative,
            form.company_brand,
            form.company_address,
            or_dash(&form.campaign_name)
        ),
        &body,
    );
    page.add_box(&[
        format!("Nama: {}", or_dash(&form.kol_name)),
        format!("Alamat: {}", or_dash(&form.kol_address)),
        format!("No. KTP: {}", or_dash(&form.kol_ktp)),
        format!("No. NPWP: {}", or_dash(&form.kol_npwp)),
    ]);
    page.add_text_block(
        "Selanjutnya disebut PIHAK KEDUA. PIHAK PERTAMA dan PIHAK KEDUA secara bersama-sama disebut sebagai \"Para Pihak\", dan secara sendiri-sendiri disebut sebagai \"Pihak\".",
        &body,
    );

    // Pasal 1
    page.add_section_title("Pasal 1 - Ruang Lingkup Pekerjaan");
    page.add_text_block("PIHAK KEDUA akan melakukan pekerjaan sebagai berikut:", &body);
    let deliverable = if form.deliverable_desc.trim().is_empty() {
        "1 (satu) konten sesuai brief PIHAK PERTAMA."
    } else {
        form.deliverable_desc.as_str()
    };
    page.add_text_block(&format!("• {}", deliverable), &body);
    page.add_text_block(
        "• Mengirimkan insight / hasil posting maksimal 7 (tujuh) hari kalender setelah konten tayang.",
        &body,
    );
    page.add_text_block(
        &format!(
            "Script / storyline diserahkan paling lambat H+3 (tiga hari kalender) setelah tanggal perjanjian ini. Draft final video diserahkan paling lambat tanggal {}. Unggah konten yang telah disetujui PIHAK PERTAMA paling lambat tanggal {} atau pada tanggal lain yang disepakati PIHAK PERTAMA.",
            format_short_date(&form.script_deadline),
            format_short_date(&form.upload_deadline)
        ),
        &body,
    );

    // Pasal 2
    page.add_section_title("Pasal 2 - Pembayaran");
    page.add_text_block(
        "PIHAK KEDUA wajib mengirim invoice / kwitansi bermaterai (digital / cetak) kepada PIHAK PERTAMA setelah kewajiban pada Pasal 1 terpenuhi.",
        &body,
    );
    page.add_text_block(
        "Pembayaran oleh PIHAK PERTAMA dilakukan selambat-lambatnya H+15 (lima belas hari kalender) setelah konten diunggah dan seluruh dokumen pendukung diterima dengan lengkap.",
        &body,
    );
    let scheme_text = if form.gross_up {
        "dengan skema gross-up (target net KOL)."
    } else {
        "dengan skema non gross-up."
    };
    page.add_text_block(
        &format!(
            "Remunerasi disepakati sebesar {} {} Potongan dan penambahan pajak mengikuti profil pajak sebagai berikut:",
            idr(form.fee_input),
            scheme_text
        ),
        &body,
    );
    page.add_box(&[
        format!("DPP (Gross): {}", idr(amounts.gross)),
        format!("PPh: {}", idr(amounts.withholding)),
        format!("PPN: {}", idr(amounts.vat_amount)),
        format!("Net ke KOL: {}", idr(amounts.net_to_party)),
    ]);
    page.add_text_block("Pembayaran akan ditransfer ke rekening berikut:", &body);
    page.add_box(&[
        format!("Bank: {}", or_dash(&form.kol_bank_name)),
        format!("No. Rekening: {}", or_dash(&form.kol_bank_acc)),
        format!("a.n. {}", or_dash(form.account_holder())),
    ]);

    // Pasal 3
    page.add_section_title("Pasal 3 - Pernyataan dan Jaminan");
    page.add_text_block(
        "PIHAK KEDUA menyatakan akan bertindak secara profesional, menjaga nama baik PIHAK PERTAMA dan klien, serta tidak melakukan tindakan yang dapat merugikan reputasi Para Pihak. PIHAK KEDUA bertanggung jawab penuh atas seluruh konten, pernyataan, dan tindakan yang dilakukan di akun media sosial miliknya sepanjang terkait dengan pelaksanaan Perjanjian ini.",
        &body,
    );
    page.add_text_block(
        "PIHAK KEDUA tidak akan membocorkan rahasia dagang, data internal, maupun informasi lain milik PIHAK PERTAMA dan/atau klien tanpa persetujuan tertulis terlebih dahulu dari PIHAK PERTAMA. Apabila PIHAK KEDUA gagal memenuhi kewajiban pada Pasal 1, maka PIHAK KEDUA dinyatakan wanprestasi dan wajib mengembalikan remunerasi yang telah diterima (apabila ada) kepada PIHAK PERTAMA.",
        &body,
    );

    // Pasal 4
    page.add_section_title("Pasal 4 - Penutup");
    page.add_text_block(
        "Segala perselisihan yang timbul dari Perjanjian ini akan diselesaikan terlebih dahulu secara musyawarah untuk mufakat. Apabila tidak tercapai mufakat, Para Pihak sepakat untuk memilih domisili hukum tetap pada Pengadilan di wilayah Jakarta Selatan.",
        &body,
    );
    page.add_text_block(
        "Perubahan atas Perjanjian ini hanya dapat dilakukan secara tertulis dan ditandatangani oleh Para Pihak, dan menjadi bagian yang tidak terpisahkan dari Perjanjian ini.",
        &body,
    );

    // Signatures
    page.ensure_space(SIGNATURE_ALLOWANCE);
    page.add_text_block(
        &format!("{}, {}", SIGNING_CITY, format_short_date(&form.spk_issue_date)),
        &body,
    );
    page.add_signature_block(
        &SignatureSlot::new(
            format!("{} – PIHAK PERTAMA", form.company_brand),
            form.company_representative.clone(),
        ),
        Some(&SignatureSlot::new("PIHAK KEDUA", kol_signature_name(form))),
    );

    let doc = page.finish();
    log::debug!("SPK {} laid out on {} page(s)", number, doc.page_count());
    doc
}

// ============================================================================
// Invoice
// ============================================================================

pub fn compose_invoice(
    form: &ContractForm,
    amounts: &AmountBreakdown,
    rates: &Rates,
    number: &str,
    geometry: PageGeometry,
) -> Document {
    let mut page = LayoutEngine::new(geometry);
    let body = TextStyle::body(&geometry);
    let totals = InvoiceTotals::new(form.fee_input, form.reimburse, amounts);

    page.add_heading("INVOICE", 16.0, geometry.line_height * 2.0);
    page.add_text_block(&format!("No: {}", or_dash(number)), &body.bold());
    page.add_text_block(
        &format!("Tanggal: {}", format_short_date(&form.spk_issue_date)),
        &body,
    );
    page.add_text_block(&format!("Untuk: {}", form.company_name), &body);
    page.add_text_block(&format!("Campaign: {}", or_dash(&form.campaign_name)), &body);
    page.add_text_block(&format!("Dari: {}", or_dash(&form.kol_name)), &body);

    page.add_section_title("Rincian");
    let description = if form.deliverable_desc.trim().is_empty() {
        "1x TikTok video"
    } else {
        form.deliverable_desc.as_str()
    };
    let mut items = vec![format!("1. {}: {}", description, idr(form.fee_input))];
    if form.reimburse > 0.0 {
        items.push(format!("2. Reimburse produk (sesuai struk): {}", idr(form.reimburse)));
    }
    page.add_box(&items);

    page.add_box(&[
        format!("Subtotal: {}", idr(totals.subtotal)),
        format!("PPh ({}): - {}", fmt_percent(rates.withholding), idr(amounts.withholding)),
        format!("PPN ({}): + {}", fmt_percent(rates.vat), idr(amounts.vat_amount)),
        format!("Total Dibayarkan (net + reimburse): {}", idr(totals.total_payable)),
    ]);

    let term = match form.payment_term {
        PaymentTerm::Dp50 => "DP 50% in advance / pelunasan setelah tayang",
        PaymentTerm::Full => "Full payment",
    };
    page.add_text_block(&format!("Metode pembayaran: {}", term), &body);
    page.add_text_block(
        &format!(
            "Rekening: {} / {} a.n. {}",
            or_dash(&form.kol_bank_name),
            or_dash(&form.kol_bank_acc),
            or_dash(form.account_holder())
        ),
        &body,
    );
    page.add_text_block(
        &format!(
            "Identitas: KTP {} | NPWP {} | Alamat {}",
            or_dash(&form.kol_ktp),
            or_dash(&form.kol_npwp),
            or_dash(&form.kol_address)
        ),
        &body,
    );

    page.ensure_space(SIGNATURE_ALLOWANCE);
    page.advance(geometry.line_height);
    page.add_signature_block(
        &SignatureSlot::new("Prepared by,", format!("{} – KOL", kol_signature_name(form))),
        None,
    );

    let doc = page.finish();
    log::debug!("invoice {} laid out on {} page(s)", number, doc.page_count());
    doc
}
