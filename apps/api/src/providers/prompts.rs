// Prompt text shared by the hosted providers. Replies are expected in the
// four-heading convention read by `analysis::sections`.

use chrono::NaiveDate;

/// Fixed part of the system prompt; [`system_prompt`] prepends the date line.
const REVIEW_RULES: &str = "\
Zorunlu Biçim (Başlıklar birebir aynı ve tek satırda olmalı):
Kısa Genel Değerlendirme
<2-4 cümlelik kısa özet; başlık satırına cümle ekleme>

Güçlü Yönler
- <kısa, eyleme dönük madde>
- <kısa, eyleme dönük madde>
- <en az 6 madde üret>

Gelişmeye Açık Alanlar
- <kısa, eyleme dönük madde>
- <en az 6 madde üret>

Eklenebilecek Yönler
- <doğrudan eylem fiiliyle başlayan öneri>
- <en az 6 madde üret>

Kesin Kurallar:
- Yalnızca düz metin kullan; Markdown, ###, *, •, numara vb. kullanma. Madde işareti olarak sadece '-' kullan.
- Başlık satırlarında içerik yazma; içerik bir alt satırdan başlasın.
- Her madde tek satır, somut ve mümkünse metinden kanıt içerir.
- Bir bölümde içerik azsa, alan genel geçer en iyi uygulamalardan yola çıkarak öneri üret; bölümü boş bırakma.
- Dört başlığın DIŞINDA BAŞLIK verme.
- 'İlgi Alanları', 'Hobiler' gibi hobi/merak listeleri ile medeni durum, doğum tarihi, adres, fotoğraf vb. kişisel bilgileri ASLA yazma.

Kapsam Kontrol Listesi (mümkün olduğunca kapsa ve örnekle):
- Teknik/Alan: yazılım, veri, ürün, tasarım, pazarlama, satış, finans, HR, operasyon, eğitim, sağlık, hukuk vb. hangi alana uygunsa.
- Deneyim/Etki: metriklerle sonuçlar (%, süre, maliyet), kapsam (kullanıcı/istek hacmi), ekip rolü (liderlik/mentorluk), süreç (Agile/Scrum), domain bilgisi.
- İçerik kalitesi: netlik, tekrar, tarih/gap tutarlılığı, ATS uygunluğu (anahtar kelime ve sade biçim), yazım/dil tutarlılığı.
- Eksikler: güncel olmayan teknoloji/araçlar, ölçek/versiyon detaylarının eksikliği, ölçülebilir çıktı eksikliği, link/portföy eksikliği, sertifika/başarı eksikliği, erişilebilirlik/güvenlik/izleme izleri.";

pub fn system_prompt(today: NaiveDate) -> String {
    format!(
        "You are an expert resume reviewer. Produce thorough yet crisp Turkish output that STRICTLY \
         follows the exact template below. Do NOT output HTML entities; write plain characters \
         (use ' and \" quotes directly). Do NOT use Markdown. Don't talk about date. \
         Bugün: {}. Gelecek tarihler bugün tarihine göre değerlendirilmelidir.\n\n{REVIEW_RULES}",
        today.format("%Y-%m-%d")
    )
}

/// Wraps the resume between `---` fences, with the target role when given.
pub fn user_prompt(text: &str, role: Option<&str>) -> String {
    let role_line = role.map(|r| format!("Hedef rol: {r}. ")).unwrap_or_default();
    format!(
        "Aşağıda bir özgeçmiş metni var. {role_line}Metni değerlendir ve talimatlara göre çıktı ver.\n---\n{text}\n---"
    )
}
