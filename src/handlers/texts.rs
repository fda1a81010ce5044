//! User-facing bot texts (Indonesian)

pub const MENU_CAPTION: &str = "🎬 <b>Selamat datang di Dramamu</b>\n\n\
    Nonton semua drama favorit cuma segelas kopi ☕\n\
    Pilih menu di bawah!";
pub const MENU_FALLBACK: &str = "Halo! Pilih menu di bawah 👇";

pub const BUTTON_OFFICIAL_GROUP: &str = "⭐️ GRUP DRAMA MU OFFICIAL ⭐️";
pub const BUTTON_SEARCH: &str = "🎬 CARI JUDUL";
pub const BUTTON_REFERRAL: &str = "💰 CARI CUAN";
pub const BUTTON_BUY_VIP: &str = "💎 BELI VIP";
pub const BUTTON_REQUEST: &str = "📝 REQ DRAMA";
pub const BUTTON_CONTACT: &str = "💬 HUBUNGI KAMI";
pub const BUTTON_UPGRADE_VIP: &str = "💎 Upgrade VIP";

pub const TOKEN_INVALID: &str = "⌛ Link sudah kedaluwarsa atau sudah dipakai.\n\nSilakan pilih film lagi dari menu.";
pub const DELIVERY_FAILED: &str = "⚠️ Film belum bisa dikirim saat ini. Coba lagi sebentar lagi.";

pub const INVALID_WEBAPP_DATA: &str = "Data dari WebApp tidak valid.";
pub const INVALID_MOVIE: &str = "Film tidak valid.";
pub const MOVIE_NOT_FOUND: &str = "Film tidak ditemukan.";
pub const NOT_VIP: &str = "🚫 Anda belum VIP.\n\nUpgrade ke VIP untuk menonton semua drama!";
pub const UNKNOWN_ACTION: &str = "⚠️ Aksi tidak dikenali.";
pub const INVALID_WITHDRAWAL: &str = "❌ Data penarikan tidak lengkap atau tidak valid.";
pub const TOO_MANY_REQUESTS: &str = "⏳ Terlalu banyak permintaan. Coba lagi dalam satu menit.";
pub const USE_START: &str = "Halo! Gunakan menu /start untuk melihat pilihan yang tersedia.";

pub const HELP: &str = "🤖 Bantuan Dramamu\n\n\
    /start - Buka menu utama\n\
    /help - Tampilkan bantuan ini\n\n\
    Pilih film lewat tombol 🎬 CARI JUDUL, lalu tekan tonton.";

pub fn drama_request_received(title: &str) -> String {
    format!(
        "✅ Request untuk '{}' telah diterima!\n\nKami akan review dan upload sesegera mungkin.",
        title
    )
}

pub fn withdrawal_received(amount: &str, method: &str, account_name: &str, account_number: &str) -> String {
    format!(
        "✅ Request penarikan {} diterima.\n\nDiproses dalam 1x24 jam ke rekening:\n{} - {}\n{}",
        amount, method, account_name, account_number
    )
}

pub fn admin_error_report(error: &str) -> String {
    format!("⚠️ Bot error: {}", error)
}
