use eyescan_types::ConditionLabel;

/// Hand-labeled symptom descriptions used to bootstrap the text model when no
/// persisted artifact exists. `Normal` has no exemplar, so a bootstrapped
/// model never scores it.
pub const SEED_CORPUS: [(&str, ConditionLabel); 21] = [
    ("red eyes watery discharge itchy", ConditionLabel::Conjunctivitis),
    ("pink eye burning sensation tearing", ConditionLabel::Conjunctivitis),
    ("conjunctiva inflamed red watery", ConditionLabel::Conjunctivitis),
    ("small bump eyelid painful tender", ConditionLabel::Stye),
    ("red lump lid margin painful", ConditionLabel::Stye),
    ("stye hordeolum eyelid swollen", ConditionLabel::Stye),
    ("painless bump eyelid hard lump", ConditionLabel::Chalazion),
    ("chalazion meibomian gland blocked", ConditionLabel::Chalazion),
    ("eyelid cyst painless firm", ConditionLabel::Chalazion),
    ("eyelid margin red crusty flaky", ConditionLabel::Blepharitis),
    ("dandruff like scales lashes", ConditionLabel::Blepharitis),
    ("blepharitis itchy burning lid", ConditionLabel::Blepharitis),
    ("droopy eyelid sagging ptosis", ConditionLabel::Ptosis),
    ("upper lid drooping vision blocked", ConditionLabel::Ptosis),
    ("eyelid falls covers pupil", ConditionLabel::Ptosis),
    ("swollen puffy eyes allergic", ConditionLabel::AllergicReaction),
    ("itchy watery seasonal allergies", ConditionLabel::AllergicReaction),
    ("allergic reaction eye swelling", ConditionLabel::AllergicReaction),
    ("eyes feel dry scratchy gritty", ConditionLabel::DryEye),
    ("burning dry sensation insufficient tears", ConditionLabel::DryEye),
    ("dry eye syndrome uncomfortable", ConditionLabel::DryEye),
];
