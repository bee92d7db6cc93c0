//! Constants used by the wells oracle.

/// Description embedded in every token metadata document.
pub const METADATA_DESCRIPTION: &str = "AI-Powered Dynamic Oil Well Valuation NFT";
/// External URL embedded in every token metadata document.
pub const METADATA_EXTERNAL_URL: &str = "https://openseacreatures.io/3";
/// Image URI embedded in every token metadata document.
pub const METADATA_IMAGE: &str =
    "ipfs://bafkreid2lid4jiy2hwgvw5abayc6mkvskunb6lfay53pshunjuk5lbfwdm";
