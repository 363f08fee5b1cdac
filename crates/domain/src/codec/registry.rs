use super::field::Field::{self, *};
use super::validate::{self, Validator};

/// Everything the codec knows about one record type.
#[derive(Debug, Clone, Copy)]
pub struct CodecEntry {
    pub code: u16,
    pub mnemonic: &'static str,
    /// RDATA layout, driving both encoding and decoding.
    pub shape: &'static [Field],
    pub validate: Validator,
}

macro_rules! codec_entries {
    ($($mnemonic:ident = $code:literal, $shape:expr $(, $validate:path)?;)*) => {
        &[$(
            CodecEntry {
                code: $code,
                mnemonic: stringify!($mnemonic),
                shape: $shape,
                validate: codec_entries!(@validate $($validate)?),
            },
        )*]
    };
    (@validate) => { validate::accept };
    (@validate $validate:path) => { $validate };
}

const HOST: &[Field] = &[Name("host")];
const TARGET: &[Field] = &[Name("target")];
const MAILBOX: &[Field] = &[Name("mailbox")];
const OPAQUE: &[Field] = &[HexRest("data")];
const TEXT: &[Field] = &[TextList("text")];

const SOA: &[Field] = &[
    Name("mname"),
    Name("rname"),
    U32("serial"),
    U32("refresh"),
    U32("retry"),
    U32("expire"),
    U32("minimum"),
];

const DELEGATION_SIGNER: &[Field] = &[
    U16("key_tag"),
    U8("algorithm"),
    U8("digest_type"),
    HexRest("digest"),
];

const PUBLIC_KEY: &[Field] = &[
    U16("flags"),
    U8("protocol"),
    U8("algorithm"),
    Base64Rest("public_key"),
];

const SIGNATURE: &[Field] = &[
    U16("type_covered"),
    U8("algorithm"),
    U8("labels"),
    U32("original_ttl"),
    U32("expiration"),
    U32("inception"),
    U16("key_tag"),
    Name("signer_name"),
    Base64Rest("signature"),
];

const CERT_ASSOCIATION: &[Field] = &[
    U8("usage"),
    U8("selector"),
    U8("matching_type"),
    HexRest("data"),
];

const SERVICE_BINDING: &[Field] = &[U16("priority"), Name("target"), SvcParams("params")];

const PREFERENCE_HOST: &[Field] = &[U16("preference"), Name("host")];

pub(crate) static BUILTIN: &[CodecEntry] = codec_entries! {
    A = 1, &[Ipv4("address")];
    NS = 2, HOST;
    MD = 3, HOST;
    MF = 4, HOST;
    CNAME = 5, TARGET;
    SOA = 6, SOA;
    MB = 7, HOST;
    MG = 8, MAILBOX;
    MR = 9, MAILBOX;
    NULL = 10, OPAQUE;
    PTR = 12, TARGET;
    HINFO = 13, &[Text("cpu"), Text("os")];
    MINFO = 14, &[Name("rmailbox"), Name("emailbox")];
    MX = 15, &[U16("preference"), Name("exchange")];
    TXT = 16, TEXT, validate::at_least_one_string;
    RP = 17, &[Name("mailbox"), Name("txt_domain")];
    AFSDB = 18, &[U16("subtype"), Name("hostname")];
    X25 = 19, &[Text("psdn_address")];
    RT = 21, PREFERENCE_HOST;
    NSAPPTR = 23, TARGET;
    SIG = 24, SIGNATURE;
    KEY = 25, PUBLIC_KEY;
    PX = 26, &[U16("preference"), Name("map822"), Name("mapx400")];
    GPOS = 27, &[Text("longitude"), Text("latitude"), Text("altitude")];
    AAAA = 28, &[Ipv6("address")];
    LOC = 29, &[
        U8("version"),
        U8("size"),
        U8("horiz_pre"),
        U8("vert_pre"),
        U32("latitude"),
        U32("longitude"),
        U32("altitude"),
    ], validate::loc_version;
    EID = 31, &[HexRest("endpoint")];
    NIMLOC = 32, &[HexRest("locator")];
    SRV = 33, &[U16("priority"), U16("weight"), U16("port"), Name("target")];
    NAPTR = 35, &[
        U16("order"),
        U16("preference"),
        Text("flags"),
        Text("service"),
        Text("regexp"),
        Name("replacement"),
    ];
    KX = 36, &[U16("preference"), Name("exchanger")];
    CERT = 37, &[U16("cert_type"), U16("key_tag"), U8("algorithm"), Base64Rest("certificate")];
    DNAME = 39, TARGET;
    APL = 42, OPAQUE;
    DS = 43, DELEGATION_SIGNER, validate::digest_present;
    SSHFP = 44, &[U8("algorithm"), U8("fingerprint_type"), HexRest("fingerprint")], validate::fingerprint_present;
    RRSIG = 46, SIGNATURE;
    NSEC = 47, &[Name("next_domain"), TypeBitmap("types")];
    DNSKEY = 48, PUBLIC_KEY, validate::dnskey_protocol;
    DHCID = 49, &[Base64Rest("digest")];
    NSEC3 = 50, &[
        U8("hash_algorithm"),
        U8("flags"),
        U16("iterations"),
        HexLen8("salt"),
        HexLen8("next_hashed_owner"),
        TypeBitmap("types"),
    ];
    NSEC3PARAM = 51, &[U8("hash_algorithm"), U8("flags"), U16("iterations"), HexLen8("salt")];
    TLSA = 52, CERT_ASSOCIATION, validate::certificate_data_present;
    SMIMEA = 53, CERT_ASSOCIATION, validate::certificate_data_present;
    HIP = 55, OPAQUE;
    NINFO = 56, TEXT;
    RKEY = 57, PUBLIC_KEY;
    TALINK = 58, &[Name("previous"), Name("next")];
    CDS = 59, DELEGATION_SIGNER, validate::digest_present;
    CDNSKEY = 60, PUBLIC_KEY, validate::dnskey_protocol;
    OPENPGPKEY = 61, &[Base64Rest("public_key")];
    CSYNC = 62, &[U32("serial"), U16("flags"), TypeBitmap("types")];
    ZONEMD = 63, &[U32("serial"), U8("scheme"), U8("hash_algorithm"), HexRest("digest")], validate::digest_present;
    SVCB = 64, SERVICE_BINDING, validate::svc_params_ascending;
    HTTPS = 65, SERVICE_BINDING, validate::svc_params_ascending;
    SPF = 99, TEXT, validate::at_least_one_string;
    UINFO = 100, &[TextRest("info")];
    UID = 101, &[U32("uid")];
    GID = 102, &[U32("gid")];
    NID = 104, &[U16("preference"), HexFixed("node_id", 8)];
    L32 = 105, &[U16("preference"), Ipv4("locator")];
    L64 = 106, &[U16("preference"), HexFixed("locator", 8)];
    LP = 107, &[U16("preference"), Name("fqdn")];
    EUI48 = 108, &[HexFixed("address", 6)];
    EUI64 = 109, &[HexFixed("address", 8)];
    TKEY = 249, &[
        Name("algorithm"),
        U32("inception"),
        U32("expiration"),
        U16("mode"),
        U16("error"),
        HexLen16("key"),
        HexLen16("other_data"),
    ];
    TSIG = 250, &[
        Name("algorithm"),
        U48("time_signed"),
        U16("fudge"),
        HexLen16("mac"),
        U16("original_id"),
        U16("error"),
        HexLen16("other_data"),
    ];
    URI = 256, &[U16("priority"), U16("weight"), TextRest("target")];
    CAA = 257, &[U8("flags"), Text("tag"), TextRest("value")], validate::caa_tag;
    AVC = 258, TEXT;
    TA = 32768, DELEGATION_SIGNER, validate::digest_present;
    DLV = 32769, DELEGATION_SIGNER, validate::digest_present;
};
