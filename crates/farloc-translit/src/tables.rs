//! Curated transliteration tables. Word entries are matched longest-first so
//! compound forms ("سبد خرید") win over their parts.

/// Persian word/phrase -> English equivalent.
pub(crate) const WORD_TABLE: &[(&str, &str)] = &[
    ("نام کاربری", "username"),
    ("رمز عبور", "password"),
    ("ثبت نام", "signup"),
    ("سبد خرید", "cart"),
    ("صفحه اصلی", "home"),
    ("دسته بندی", "category"),
    ("نام خانوادگی", "last name"),
    ("شماره تلفن", "phone number"),
    ("پست الکترونیک", "email"),
    ("کد پستی", "postal code"),
    ("باز کردن", "open"),
    ("ورود", "login"),
    ("خروج", "logout"),
    ("ذخیره", "save"),
    ("حذف", "delete"),
    ("ویرایش", "edit"),
    ("افزودن", "add"),
    ("جستجو", "search"),
    ("کاربر", "user"),
    ("کاربران", "users"),
    ("تایید", "confirm"),
    ("تأیید", "confirm"),
    ("لغو", "cancel"),
    ("بستن", "close"),
    ("ارسال", "send"),
    ("دریافت", "receive"),
    ("دانلود", "download"),
    ("بارگذاری", "upload"),
    ("نمایش", "show"),
    ("پنهان", "hide"),
    ("تنظیمات", "settings"),
    ("پروفایل", "profile"),
    ("خانه", "home"),
    ("پیام", "message"),
    ("پیام ها", "messages"),
    ("خطا", "error"),
    ("هشدار", "warning"),
    ("موفقیت", "success"),
    ("اطلاعات", "info"),
    ("کمک", "help"),
    ("راهنما", "guide"),
    ("درباره", "about"),
    ("تماس", "contact"),
    ("قیمت", "price"),
    ("خرید", "buy"),
    ("فروش", "sell"),
    ("پرداخت", "payment"),
    ("فاکتور", "invoice"),
    ("سفارش", "order"),
    ("محصول", "product"),
    ("محصولات", "products"),
    ("عنوان", "title"),
    ("توضیحات", "description"),
    ("تاریخ", "date"),
    ("زمان", "time"),
    ("امروز", "today"),
    ("دیروز", "yesterday"),
    ("فردا", "tomorrow"),
    ("بله", "yes"),
    ("خیر", "no"),
    ("نام", "name"),
    ("فایل", "file"),
    ("فهرست", "list"),
    ("صفحه", "page"),
    ("بعدی", "next"),
    ("قبلی", "previous"),
    ("جدید", "new"),
    ("آدرس", "address"),
    ("شهر", "city"),
    ("کشور", "country"),
    ("زبان", "language"),
    ("ترجمه", "translation"),
    ("متن", "text"),
    ("دکمه", "button"),
    ("منو", "menu"),
    ("گزارش", "report"),
    ("چاپ", "print"),
    ("کپی", "copy"),
    ("انتخاب", "select"),
    ("همه", "all"),
    ("هیچ", "none"),
    ("شروع", "start"),
    ("پایان", "end"),
    ("ادامه", "continue"),
    ("بازگشت", "back"),
    ("خوش آمدید", "welcome"),
];

/// Persian/Arabic letter -> Latin fallback, applied one character at a time
/// after the word pass. Combining marks map to nothing.
pub(crate) const CHAR_TABLE: &[(char, &str)] = &[
    ('ا', "a"),
    ('آ', "a"),
    ('أ', "a"),
    ('إ', "e"),
    ('ء', ""),
    ('ؤ', "o"),
    ('ئ', "y"),
    ('ب', "b"),
    ('پ', "p"),
    ('ت', "t"),
    ('ث', "s"),
    ('ج', "j"),
    ('چ', "ch"),
    ('ح', "h"),
    ('خ', "kh"),
    ('د', "d"),
    ('ذ', "z"),
    ('ر', "r"),
    ('ز', "z"),
    ('ژ', "zh"),
    ('س', "s"),
    ('ش', "sh"),
    ('ص', "s"),
    ('ض', "z"),
    ('ط', "t"),
    ('ظ', "z"),
    ('ع', "a"),
    ('غ', "gh"),
    ('ف', "f"),
    ('ق', "gh"),
    ('ک', "k"),
    ('ك', "k"),
    ('گ', "g"),
    ('ل', "l"),
    ('م', "m"),
    ('ن', "n"),
    ('و', "v"),
    ('ه', "h"),
    ('ة', "h"),
    ('ی', "y"),
    ('ي', "y"),
    // combining marks used in fully vocalized text
    ('\u{064B}', ""),
    ('\u{064C}', ""),
    ('\u{064D}', ""),
    ('\u{064E}', ""),
    ('\u{064F}', ""),
    ('\u{0650}', ""),
    ('\u{0651}', ""),
    ('\u{0652}', ""),
];

/// Extended Arabic-Indic (Persian) and Arabic-Indic digits -> ASCII.
pub(crate) const DIGIT_TABLE: &[(char, char)] = &[
    ('۰', '0'),
    ('۱', '1'),
    ('۲', '2'),
    ('۳', '3'),
    ('۴', '4'),
    ('۵', '5'),
    ('۶', '6'),
    ('۷', '7'),
    ('۸', '8'),
    ('۹', '9'),
    ('٠', '0'),
    ('١', '1'),
    ('٢', '2'),
    ('٣', '3'),
    ('٤', '4'),
    ('٥', '5'),
    ('٦', '6'),
    ('٧', '7'),
    ('٨', '8'),
    ('٩', '9'),
];
